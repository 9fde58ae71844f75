//! Face-anchored sketch planes and blind cuts.
//!
//! A `Workplane` sits on one face of a solid's bounding box, centred on that
//! face. Rectangles sketched on it are cut into the solid as prisms.

use tracing::debug;

use crate::traits::Kernel;
use crate::types::*;

/// Distance a cutting tool extends outside the face it starts from, so the
/// tool never shares a plane with that face.
pub const CUT_OVERSHOOT: f64 = 0.5;

/// Bounding-box face of a solid, named by its outward direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSelector {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl FaceSelector {
    /// Axis the face is perpendicular to.
    pub fn axis(self) -> usize {
        match self {
            FaceSelector::PosX | FaceSelector::NegX => 0,
            FaceSelector::PosY | FaceSelector::NegY => 1,
            FaceSelector::PosZ | FaceSelector::NegZ => 2,
        }
    }

    /// +1 for the far face, -1 for the near one.
    pub fn sign(self) -> f64 {
        match self {
            FaceSelector::PosX | FaceSelector::PosY | FaceSelector::PosZ => 1.0,
            FaceSelector::NegX | FaceSelector::NegY | FaceSelector::NegZ => -1.0,
        }
    }

    /// World axes of the sketch's local (u, v) directions.
    pub fn sketch_axes(self) -> (usize, usize) {
        match self.axis() {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        }
    }
}

/// Sketch plane on a face, centred on the face's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workplane {
    pub face: FaceSelector,
    pub origin: [f64; 3],
}

impl Workplane {
    pub fn on_face(bounds: &Aabb, face: FaceSelector) -> Self {
        let mut origin = bounds.center();
        let axis = face.axis();
        origin[axis] = if face.sign() > 0.0 {
            bounds.max[axis]
        } else {
            bounds.min[axis]
        };
        Self { face, origin }
    }

    /// Bounds of a rectangle `rect` (u, v) on this plane swept `depth` into
    /// the solid and `overshoot` out of it.
    pub fn prism(&self, rect: [f64; 2], depth: f64, overshoot: f64) -> Aabb {
        let axis = self.face.axis();
        let (u, v) = self.face.sketch_axes();
        let mut size = [0.0; 3];
        size[u] = rect[0];
        size[v] = rect[1];
        size[axis] = depth + overshoot;

        let mut center = self.origin;
        center[axis] += self.face.sign() * (overshoot - depth) / 2.0;
        Aabb::centered(size, center)
    }
}

/// Cut a centred rectangle `rect` from `face` of `solid`, `depth` deep.
///
/// The kernel's own validation decides what happens with non-positive
/// sizes or a rectangle wider than the face.
pub fn cut_blind(
    kernel: &mut dyn Kernel,
    solid: &KernelSolidHandle,
    face: FaceSelector,
    rect: [f64; 2],
    depth: f64,
) -> Result<KernelSolidHandle, KernelError> {
    if !(depth.is_finite() && depth > 0.0) {
        return Err(KernelError::InvalidDimensions {
            operation: "blind cut".to_string(),
            reason: format!("depth must be positive, got {}", depth),
        });
    }
    let bounds = kernel.bounding_box(solid)?;
    let plane = Workplane::on_face(&bounds, face);
    let tool_bounds = plane.prism(rect, depth, CUT_OVERSHOOT);
    debug!(?face, ?rect, depth, "blind cut");

    let tool = kernel.make_box(tool_bounds.size(), tool_bounds.center())?;
    kernel.boolean_subtract(solid, &tool)
}
