//! MockKernel: deterministic test double implementing Kernel.
//!
//! Solids are kept as material boxes with the tool boxes subtracted from
//! them. Every corner is carried through every affine map, so bounds and
//! positions stay exact for the box-and-transform shapes the mount uses.
//! Subtractions are recorded, not evaluated: bounds and tessellation only
//! see the material boxes.

use crate::traits::Kernel;
use crate::types::*;
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use std::collections::HashMap;

/// Triangles of a box, indexed by corner bit pattern (bit0 = +x, bit1 = +y,
/// bit2 = +z), wound counter-clockwise seen from outside.
const BOX_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 3, 1], // -z
    [4, 5, 7],
    [4, 7, 6], // +z
    [0, 1, 5],
    [0, 5, 4], // -y
    [2, 6, 7],
    [2, 7, 3], // +y
    [0, 4, 6],
    [0, 6, 2], // -x
    [1, 3, 7],
    [1, 7, 5], // +x
];

/// Eight corners of a (possibly rotated or mirrored) box.
#[derive(Debug, Clone, PartialEq)]
pub struct MockBox {
    pub corners: [Point3<f64>; 8],
}

impl MockBox {
    fn centered(size: [f64; 3], center: [f64; 3]) -> Self {
        let corners = std::array::from_fn(|i| {
            let pick = |bit: usize, axis: usize| {
                let half = size[axis] / 2.0;
                if i & (1 << bit) != 0 {
                    center[axis] + half
                } else {
                    center[axis] - half
                }
            };
            Point3::new(pick(0, 0), pick(1, 1), pick(2, 2))
        });
        Self { corners }
    }

    fn transformed(&self, m: &Matrix4<f64>) -> Self {
        Self {
            corners: self.corners.map(|p| m.transform_point(&p)),
        }
    }
}

/// One material box and the tools cut from it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockTerm {
    pub material: MockBox,
    pub cuts: Vec<MockBox>,
}

/// A synthetic solid: the union of its terms.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSolid {
    pub terms: Vec<MockTerm>,
    /// Odd number of reflections applied; flips triangle winding.
    pub mirrored: bool,
}

impl MockSolid {
    fn transformed(&self, m: &Matrix4<f64>, reflects: bool) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| MockTerm {
                    material: t.material.transformed(m),
                    cuts: t.cuts.iter().map(|c| c.transformed(m)).collect(),
                })
                .collect(),
            mirrored: self.mirrored ^ reflects,
        }
    }

    fn material_points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.terms
            .iter()
            .flat_map(|t| t.material.corners.iter().map(|p| [p.x, p.y, p.z]))
    }
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    /// Operation names in call order.
    pub log: Vec<String>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            log: Vec::new(),
        }
    }

    fn store(&mut self, solid: MockSolid, op: &str) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(h.id(), solid);
        self.log.push(op.to_string());
        h
    }

    /// Inspect the synthetic solid behind a handle.
    pub fn solid(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or_else(|| KernelError::not_found(handle))
    }

    /// Number of operations of the given name performed so far.
    pub fn count(&self, op: &str) -> usize {
        self.log.iter().filter(|o| o.as_str() == op).count()
    }

    fn map(
        &mut self,
        solid: &KernelSolidHandle,
        m: Matrix4<f64>,
        reflects: bool,
        op: &str,
    ) -> Result<KernelSolidHandle, KernelError> {
        let mapped = self.solid(solid)?.transformed(&m, reflects);
        Ok(self.store(mapped, op))
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn make_box(
        &mut self,
        size: [f64; 3],
        center: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(KernelError::InvalidDimensions {
                operation: "box".to_string(),
                reason: format!("extents must be positive, got {:?}", size),
            });
        }
        let solid = MockSolid {
            terms: vec![MockTerm {
                material: MockBox::centered(size, center),
                cuts: Vec::new(),
            }],
            mirrored: false,
        };
        Ok(self.store(solid, "box"))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let sa = self.solid(a)?;
        let sb = self.solid(b)?;
        if sa.mirrored != sb.mirrored {
            return Err(KernelError::BooleanFailed {
                reason: "mock kernel cannot mix mirrored and unmirrored solids".to_string(),
            });
        }
        let mut terms = sa.terms.clone();
        terms.extend(sb.terms.iter().cloned());
        let mirrored = sa.mirrored;
        Ok(self.store(MockSolid { terms, mirrored }, "union"))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let tools: Vec<MockBox> = self
            .solid(b)?
            .terms
            .iter()
            .map(|t| t.material.clone())
            .collect();
        let mut result = self.solid(a)?.clone();
        for term in &mut result.terms {
            term.cuts.extend(tools.iter().cloned());
        }
        Ok(self.store(result, "subtract"))
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let m = Matrix4::new_translation(&Vector3::new(offset[0], offset[1], offset[2]));
        self.map(solid, m, false, "translate")
    }

    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        origin: [f64; 3],
        axis: [f64; 3],
        angle_deg: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = Vector3::new(axis[0], axis[1], axis[2]);
        let Some(axis) = Unit::try_new(axis, 1e-12) else {
            return Err(KernelError::Other {
                message: "rotation axis has zero length".to_string(),
            });
        };
        let o = Vector3::new(origin[0], origin[1], origin[2]);
        let rot = Rotation3::from_axis_angle(&axis, angle_deg.to_radians()).to_homogeneous();
        let m = Matrix4::new_translation(&o) * rot * Matrix4::new_translation(&-o);
        self.map(solid, m, false, "rotate")
    }

    fn mirror(
        &mut self,
        solid: &KernelSolidHandle,
        plane: MirrorPlane,
        base_point: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut scale = Vector3::new(1.0, 1.0, 1.0);
        scale[plane.normal_axis()] = -1.0;
        let p = Vector3::new(base_point[0], base_point[1], base_point[2]);
        let m = Matrix4::new_translation(&p)
            * Matrix4::new_nonuniform_scaling(&scale)
            * Matrix4::new_translation(&-p);
        self.map(solid, m, true, "mirror")
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<Aabb, KernelError> {
        Aabb::from_points(self.solid(solid)?.material_points()).ok_or_else(|| KernelError::Other {
            message: "mock solid has no material".to_string(),
        })
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let s = self.solid(solid)?;
        let mut mesh = RenderMesh::default();

        for (face_index, term) in s.terms.iter().enumerate() {
            let base = mesh.vertex_count() as u32;
            let start_index = mesh.indices.len() as u32;
            for p in &term.material.corners {
                mesh.vertices.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
                mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
            }
            for tri in BOX_TRIANGLES {
                let tri = if s.mirrored {
                    [tri[0], tri[2], tri[1]]
                } else {
                    tri
                };
                mesh.indices.extend(tri.iter().map(|&i| base + i as u32));
            }
            mesh.face_ranges.push(FaceRange {
                face_index: face_index as u32,
                start_index,
                end_index: mesh.indices.len() as u32,
            });
        }

        self.log.push("tessellate".to_string());
        Ok(mesh)
    }

    fn export_step(
        &mut self,
        solid: &KernelSolidHandle,
        name: &str,
    ) -> Result<String, KernelError> {
        let points: Vec<[f64; 3]> = self.solid(solid)?.material_points().collect();
        let mut out = String::new();
        out.push_str("ISO-10303-21;\nHEADER;\n");
        out.push_str(&format!("FILE_NAME('{}');\n", name));
        out.push_str("ENDSEC;\nDATA;\n");
        for (i, p) in points.iter().enumerate() {
            out.push_str(&format!(
                "#{} = CARTESIAN_POINT('', ({}, {}, {}));\n",
                i + 1,
                p[0],
                p[1],
                p[2]
            ));
        }
        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        self.log.push("export_step".to_string());
        Ok(out)
    }
}
