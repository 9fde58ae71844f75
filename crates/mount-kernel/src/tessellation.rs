//! Tessellation wrapper with face-range metadata.
//!
//! Wraps truck-meshalgo to produce a RenderMesh whose FaceRange entries map
//! triangle index ranges back to the B-rep faces they came from.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::MeshableShape;
use tracing::debug;

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh with per-face tracking.
pub fn tessellate_solid(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {}", tolerance),
        });
    }

    let meshed_solid = solid.triangulation(tolerance);

    let mut mesh = RenderMesh::default();
    let mut face_index = 0u32;

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let index = face_index;
            face_index += 1;

            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(face_mesh) = maybe_mesh else {
                continue;
            };

            // Inverted faces carry their mesh with the wrong winding
            let face_mesh = if !face.orientation() {
                let mut m = face_mesh;
                m.invert();
                m
            } else {
                face_mesh
            };

            let start_index = mesh.indices.len() as u32;
            append_polygon(&mut mesh, &face_mesh);
            let end_index = mesh.indices.len() as u32;

            if end_index > start_index {
                mesh.face_ranges.push(FaceRange {
                    face_index: index,
                    start_index,
                    end_index,
                });
            }
        }
    }

    if mesh.is_empty() {
        debug!("per-face tessellation empty, falling back to merged polygon");
        return tessellate_solid_merged(solid, tolerance);
    }

    Ok(mesh)
}

/// Fallback tessellation: merge everything into a single PolygonMesh.
fn tessellate_solid_merged(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    use truck_meshalgo::tessellation::MeshedShape;

    let polygon = solid.triangulation(tolerance).to_polygon();

    let mut mesh = RenderMesh::default();
    append_polygon(&mut mesh, &polygon);

    if mesh.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }

    mesh.face_ranges.push(FaceRange {
        face_index: 0,
        start_index: 0,
        end_index: mesh.indices.len() as u32,
    });
    Ok(mesh)
}

/// Append a polygon's positions, normals and triangles to `mesh`.
fn append_polygon(mesh: &mut RenderMesh, polygon: &PolygonMesh) {
    let base_vertex = mesh.vertex_count() as u32;
    let positions = polygon.positions();
    let normals = polygon.normals();

    for pos in positions {
        mesh.vertices.push(pos[0] as f32);
        mesh.vertices.push(pos[1] as f32);
        mesh.vertices.push(pos[2] as f32);
    }

    // Normals are per position only when the counts line up.
    if normals.len() == positions.len() {
        for norm in normals {
            mesh.normals.push(norm[0] as f32);
            mesh.normals.push(norm[1] as f32);
            mesh.normals.push(norm[2] as f32);
        }
    } else {
        for _ in 0..positions.len() {
            mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }

    for tri in polygon.tri_faces() {
        for v in tri.iter() {
            mesh.indices.push(v.pos as u32 + base_vertex);
        }
    }
}
