//! Sanity checks run on a mesh before it is written.
//!
//! A solid that tessellates to nothing, to NaNs, or to an inside-out shell
//! is reported as an error instead of being written as a broken file.

use mount_kernel::{Aabb, RenderMesh};

use crate::errors::ExportError;

/// Smallest enclosed volume, in mm³, accepted for export.
pub const MIN_EXPORT_VOLUME: f64 = 1e-3;

/// What a mesh looked like when it passed inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub triangles: usize,
    pub signed_volume: f64,
    pub bounds: Option<Aabb>,
}

/// Validate indices and coordinates, and measure the mesh.
pub fn inspect(mesh: &RenderMesh, name: &str) -> Result<MeshReport, ExportError> {
    let degenerate = |reason: String| ExportError::DegenerateMesh {
        name: name.to_string(),
        reason,
    };

    if mesh.vertices.len() % 3 != 0 || mesh.indices.len() % 3 != 0 {
        return Err(degenerate(format!(
            "buffer lengths not multiples of 3 ({} floats, {} indices)",
            mesh.vertices.len(),
            mesh.indices.len()
        )));
    }
    if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= mesh.vertex_count()) {
        return Err(degenerate(format!(
            "index {} out of range (vertex count = {})",
            bad,
            mesh.vertex_count()
        )));
    }
    if mesh.vertices.iter().any(|v| !v.is_finite()) {
        return Err(degenerate("non-finite vertex coordinate".to_string()));
    }

    let bounds = Aabb::from_points((0..mesh.vertex_count() as u32).map(|i| mesh.position(i)));
    Ok(MeshReport {
        triangles: mesh.triangle_count(),
        signed_volume: mesh.signed_volume(),
        bounds,
    })
}

/// `inspect`, then reject meshes with no triangles or with less than
/// `MIN_EXPORT_VOLUME` enclosed (inside-out shells have negative volume).
pub fn check_exportable(mesh: &RenderMesh, name: &str) -> Result<MeshReport, ExportError> {
    let report = inspect(mesh, name)?;
    if report.triangles == 0 {
        return Err(ExportError::DegenerateMesh {
            name: name.to_string(),
            reason: "mesh has no triangles".to_string(),
        });
    }
    if report.signed_volume < MIN_EXPORT_VOLUME {
        return Err(ExportError::DegenerateMesh {
            name: name.to_string(),
            reason: format!("enclosed volume {:.6} mm³ is too small", report.signed_volume),
        });
    }
    Ok(report)
}
