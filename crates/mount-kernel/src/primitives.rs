//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box: everything is successive sweeps.

use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{Point3, Vector3};

use crate::types::KernelError;

/// Reject sizes a sweep cannot turn into a closed solid.
pub fn validate_box_size(size: [f64; 3]) -> Result<(), KernelError> {
    for (axis, &s) in ["x", "y", "z"].iter().zip(size.iter()) {
        if !s.is_finite() || s <= 0.0 {
            return Err(KernelError::InvalidDimensions {
                operation: "box".to_string(),
                reason: format!("{} extent must be positive, got {}", axis, s),
            });
        }
    }
    Ok(())
}

/// Create a box solid via successive translational sweeps, centred on `center`.
pub fn make_box(size: [f64; 3], center: [f64; 3]) -> Solid {
    let corner = Point3::new(
        center[0] - size[0] / 2.0,
        center[1] - size[1] / 2.0,
        center[2] - size[2] / 2.0,
    );
    let v = builder::vertex(corner);
    let edge = builder::tsweep(&v, Vector3::new(size[0], 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, size[1], 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, size[2]))
}

/// Corner positions of every vertex in the solid's boundary.
pub fn vertex_points(solid: &Solid) -> Vec<[f64; 3]> {
    let mut points = Vec::new();
    for shell in solid.boundaries().iter() {
        for v in shell.vertex_iter() {
            let p = v.point();
            points.push([p[0], p[1], p[2]]);
        }
    }
    points
}
