//! Binary STL writer and a reader used to sanity-check what was written.
//!
//! Layout: 80-byte header, little-endian u32 triangle count, then 50 bytes
//! per triangle (normal, three vertices, u16 attribute).

use mount_kernel::RenderMesh;

use crate::errors::ExportError;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// Summary of a parsed binary STL.
#[derive(Debug, Clone, PartialEq)]
pub struct StlSummary {
    pub header: String,
    pub triangles: usize,
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub signed_volume: f64,
}

/// Encode `mesh` as binary STL. `name` goes into the header, truncated to
/// 80 bytes. Indices must already be in range (see `mesh_check::inspect`).
pub fn write_binary_stl(mesh: &RenderMesh, name: &str) -> Vec<u8> {
    let tri_count = mesh.triangle_count();
    let mut buf = Vec::with_capacity(HEADER_LEN + 4 + tri_count * TRIANGLE_LEN);

    let header = format!("binary STL: {}", name);
    let header = header.as_bytes();
    buf.extend_from_slice(&header[..header.len().min(HEADER_LEN)]);
    buf.resize(HEADER_LEN, 0u8);

    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.position(i));
        for n in facet_normal(a, b, c) {
            buf.extend_from_slice(&(n as f32).to_le_bytes());
        }
        for &idx in tri {
            let vi = idx as usize * 3;
            for v in &mesh.vertices[vi..vi + 3] {
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    buf
}

fn facet_normal(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [f64; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Parse a binary STL and summarise it.
pub fn read_binary_stl(bytes: &[u8]) -> Result<StlSummary, ExportError> {
    let malformed = |reason: String| ExportError::MalformedStl { reason };

    if bytes.len() < HEADER_LEN + 4 {
        return Err(malformed(format!("{} bytes is shorter than the header", bytes.len())));
    }
    let header = String::from_utf8_lossy(&bytes[..HEADER_LEN])
        .trim_end_matches('\0')
        .to_string();

    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    let triangles = u32::from_le_bytes(count) as usize;

    let expected = HEADER_LEN + 4 + triangles * TRIANGLE_LEN;
    if bytes.len() != expected {
        return Err(malformed(format!(
            "{} triangles need {} bytes, found {}",
            triangles,
            expected,
            bytes.len()
        )));
    }

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    let mut signed_volume = 0.0;

    for record in bytes[HEADER_LEN + 4..].chunks_exact(TRIANGLE_LEN) {
        let mut corners = [[0.0f64; 3]; 3];
        // Skip the stored normal; it is recomputed on demand.
        for (k, corner) in corners.iter_mut().enumerate() {
            for (axis, value) in corner.iter_mut().enumerate() {
                let at = 12 + k * 12 + axis * 4;
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&record[at..at + 4]);
                let f = f32::from_le_bytes(raw);
                min[axis] = min[axis].min(f);
                max[axis] = max[axis].max(f);
                *value = f as f64;
            }
        }
        let [a, b, c] = corners;
        signed_volume += (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0]))
            / 6.0;
    }

    if triangles == 0 {
        min = [0.0; 3];
        max = [0.0; 3];
    }

    Ok(StlSummary {
        header,
        triangles,
        min,
        max,
        signed_volume,
    })
}
