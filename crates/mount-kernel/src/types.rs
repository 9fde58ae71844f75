use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the kernel that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("invalid dimensions for {operation}: {reason}")]
    InvalidDimensions { operation: String, reason: String },

    #[error("solid not found: handle {handle}")]
    EntityNotFound { handle: u64 },

    #[error("export failed: {reason}")]
    ExportFailed { reason: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    pub(crate) fn not_found(handle: &KernelSolidHandle) -> Self {
        KernelError::EntityNotFound {
            handle: handle.id(),
        }
    }
}

/// Plane a solid is mirrored across, named by the two axes it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorPlane {
    XY,
    YZ,
    XZ,
}

impl MirrorPlane {
    /// Index of the axis the plane is perpendicular to.
    pub fn normal_axis(self) -> usize {
        match self {
            MirrorPlane::YZ => 0,
            MirrorPlane::XZ => 1,
            MirrorPlane::XY => 2,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    /// Box of the given size centred on `center`.
    pub fn centered(size: [f64; 3], center: [f64; 3]) -> Self {
        Self {
            min: [
                center[0] - size[0] / 2.0,
                center[1] - size[1] / 2.0,
                center[2] - size[2] / 2.0,
            ],
            max: [
                center[0] + size[0] / 2.0,
                center[1] + size[1] / 2.0,
                center[2] + size[2] / 2.0,
            ],
        }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = [f64; 3]>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Aabb {
            min: first,
            max: first,
        };
        for p in iter {
            for i in 0..3 {
                bb.min[i] = bb.min[i].min(p[i]);
                bb.max[i] = bb.max[i].max(p[i]);
            }
        }
        Some(bb)
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn volume(&self) -> f64 {
        let s = self.size();
        s[0] * s[1] * s[2]
    }

    pub fn translated(&self, offset: [f64; 3]) -> Self {
        Self {
            min: [
                self.min[0] + offset[0],
                self.min[1] + offset[1],
                self.min[2] + offset[2],
            ],
            max: [
                self.max[0] + offset[0],
                self.max[1] + offset[1],
                self.max[2] + offset[2],
            ],
        }
    }

    /// Reflection across `plane` through `base_point`.
    pub fn mirrored(&self, plane: MirrorPlane, base_point: [f64; 3]) -> Self {
        let axis = plane.normal_axis();
        let mut out = *self;
        out.min[axis] = 2.0 * base_point[axis] - self.max[axis];
        out.max[axis] = 2.0 * base_point[axis] - self.min[axis];
        out
    }

    /// If the union of the two boxes is itself a box, return it.
    ///
    /// That holds when one contains the other, or when they agree on two axes
    /// and overlap or touch on the third.
    pub fn fused(&self, other: &Aabb, tol: f64) -> Option<Aabb> {
        if self.contains(other, tol) {
            return Some(*self);
        }
        if other.contains(self, tol) {
            return Some(*other);
        }
        let same = |i: usize| {
            (self.min[i] - other.min[i]).abs() <= tol && (self.max[i] - other.max[i]).abs() <= tol
        };
        for k in 0..3 {
            let others_match = (0..3).filter(|&i| i != k).all(same);
            let touching = self.min[k] <= other.max[k] + tol && other.min[k] <= self.max[k] + tol;
            if others_match && touching {
                let mut out = *self;
                out.min[k] = self.min[k].min(other.min[k]);
                out.max[k] = self.max[k].max(other.max[k]);
                return Some(out);
            }
        }
        None
    }

    pub fn contains(&self, other: &Aabb, tol: f64) -> bool {
        (0..3).all(|i| self.min[i] <= other.min[i] + tol && self.max[i] >= other.max[i] - tol)
    }
}

/// Tessellated triangle mesh, as written to STL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals [nx0, ny0, nz0, nx1, ny1, nz1, ...].
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
    /// Mapping from triangle ranges to the faces they were tessellated from.
    pub face_ranges: Vec<FaceRange>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `index` in double precision.
    pub fn position(&self, index: u32) -> [f64; 3] {
        let i = index as usize * 3;
        [
            self.vertices[i] as f64,
            self.vertices[i + 1] as f64,
            self.vertices[i + 2] as f64,
        ]
    }

    /// Enclosed volume by the divergence theorem. Positive when triangles
    /// wind counter-clockwise seen from outside.
    pub fn signed_volume(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let a = self.position(tri[0]);
                let b = self.position(tri[1]);
                let c = self.position(tri[2]);
                (a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
                    + a[2] * (b[0] * c[1] - b[1] * c[0]))
                    / 6.0
            })
            .sum()
    }
}

/// Maps a contiguous range of triangle indices to a source face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRange {
    /// Position of the face in the solid's boundary traversal.
    pub face_index: u32,
    /// Start index in the indices array (inclusive).
    pub start_index: u32,
    /// End index in the indices array (exclusive).
    pub end_index: u32,
}
