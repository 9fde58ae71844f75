//! TruckKernel: real geometry kernel wrapping truck's API.
//!
//! Every stored solid remembers the sweep or boolean result it came from and
//! the affine map placing it. Further moves compose with that map and are
//! applied to the source in one `builder::transformed` call: mapping an
//! already mapped boolean result a second time does not terminate in truck.

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

/// Tolerance handed to truck-shapeops for every boolean.
const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Coarse tessellation used only to read a solid's orientation.
const ORIENTATION_PROBE_TOLERANCE: f64 = 0.5;

/// Two boxes closer than this on every face are treated as sharing the face.
const FUSE_TOLERANCE: f64 = 1e-9;

/// A solid and how it was placed.
struct Entry {
    /// Output of a sweep or a boolean, never itself transformed.
    source: Solid,
    /// Map from `source` to `placed`.
    placement: Matrix4,
    /// Shell orientation was reversed after a reflection.
    flipped: bool,
    /// `source` under `placement`.
    placed: Solid,
}

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Entry>,
    /// Solids known to be exact axis-aligned boxes.
    boxes: HashMap<u64, Aabb>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            boxes: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, entry: Entry, exact_box: Option<Aabb>) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), entry);
        if let Some(bb) = exact_box {
            self.boxes.insert(handle.id(), bb);
        }
        handle
    }

    /// Store a fresh sweep or boolean result.
    pub(crate) fn store_solid(&mut self, solid: Solid, exact_box: Option<Aabb>) -> KernelSolidHandle {
        let entry = Entry {
            placed: solid.clone(),
            source: solid,
            placement: Matrix4::from_scale(1.0),
            flipped: false,
        };
        self.store(entry, exact_box)
    }

    fn entry(&self, handle: &KernelSolidHandle) -> Result<&Entry, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or_else(|| KernelError::not_found(handle))
    }

    /// Borrow the truck solid behind a handle.
    pub fn get_solid(&self, handle: &KernelSolidHandle) -> Result<&Solid, KernelError> {
        Ok(&self.entry(handle)?.placed)
    }

    fn exact_box(&self, handle: &KernelSolidHandle) -> Option<Aabb> {
        self.boxes.get(&handle.id()).copied()
    }

    /// Entry for `m` applied after the placement of `handle`. `flipped` is
    /// carried over; reflections decide it themselves.
    fn compose(&self, handle: &KernelSolidHandle, m: Matrix4) -> Result<Entry, KernelError> {
        let entry = self.entry(handle)?;
        let placement = m * entry.placement;
        let mut placed = builder::transformed(&entry.source, placement);
        if entry.flipped {
            placed.not();
        }
        Ok(Entry {
            source: entry.source.clone(),
            placement,
            flipped: entry.flipped,
            placed,
        })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_vector(v: [f64; 3]) -> Vector3 {
    Vector3::new(v[0], v[1], v[2])
}

/// Reflection across `plane` through `base`: T(base) * S * T(-base).
fn mirror_matrix(plane: MirrorPlane, base: [f64; 3]) -> Matrix4 {
    let mut scale = [1.0, 1.0, 1.0];
    scale[plane.normal_axis()] = -1.0;
    let base = to_vector(base);
    Matrix4::from_translation(base)
        * Matrix4::from_nonuniform_scale(scale[0], scale[1], scale[2])
        * Matrix4::from_translation(-base)
}

/// Right-handed rotation about the unit `axis` through `origin`.
fn rotation_matrix(origin: Point3, axis: Vector3, angle: Rad<f64>) -> Matrix4 {
    let o = Vector3::new(origin.x, origin.y, origin.z);
    Matrix4::from_translation(o) * Matrix4::from_axis_angle(axis, angle) * Matrix4::from_translation(-o)
}

impl Kernel for TruckKernel {
    #[instrument(skip(self))]
    fn make_box(
        &mut self,
        size: [f64; 3],
        center: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        primitives::validate_box_size(size)?;
        let solid = primitives::make_box(size, center);
        Ok(self.store_solid(solid, Some(Aabb::centered(size, center))))
    }

    #[instrument(skip(self))]
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        // truck-shapeops cannot resolve coplanar faces; boxes that fuse into
        // a single box are rebuilt directly instead.
        if let (Some(box_a), Some(box_b)) = (self.exact_box(a), self.exact_box(b)) {
            if let Some(fused) = box_a.fused(&box_b, FUSE_TOLERANCE) {
                debug!(?fused, "fusing boxes without shapeops");
                let solid = primitives::make_box(fused.size(), fused.center());
                return Ok(self.store_solid(solid, Some(fused)));
            }
        }

        let solid_a = self.get_solid(a)?;
        let solid_b = self.get_solid(b)?;
        let result = truck_shapeops::or(solid_a, solid_b, BOOLEAN_TOLERANCE).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck or() returned None".to_string(),
            }
        })?;
        Ok(self.store_solid(result, None))
    }

    #[instrument(skip(self))]
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.get_solid(a)?;
        let mut solid_b = self.get_solid(b)?.clone();

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = truck_shapeops::and(solid_a, &solid_b, BOOLEAN_TOLERANCE).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck and() returned None for subtraction".to_string(),
            }
        })?;
        Ok(self.store_solid(result, None))
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let moved = self.compose(solid, Matrix4::from_translation(to_vector(offset)))?;
        let exact = self.exact_box(solid).map(|bb| bb.translated(offset));
        Ok(self.store(moved, exact))
    }

    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        origin: [f64; 3],
        axis: [f64; 3],
        angle_deg: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = to_vector(axis);
        if axis.magnitude() < 1e-12 {
            return Err(KernelError::Other {
                message: "rotation axis has zero length".to_string(),
            });
        }
        let origin = Point3::new(origin[0], origin[1], origin[2]);
        let m = rotation_matrix(origin, axis.normalize(), Rad(angle_deg.to_radians()));
        let rotated = self.compose(solid, m)?;
        Ok(self.store(rotated, None))
    }

    fn mirror(
        &mut self,
        solid: &KernelSolidHandle,
        plane: MirrorPlane,
        base_point: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let mut mirrored = self.compose(solid, mirror_matrix(plane, base_point))?;
        // A reflection can leave every face inside out.
        let probe = tessellation::tessellate_solid(&mirrored.placed, ORIENTATION_PROBE_TOLERANCE)?;
        if probe.signed_volume() < 0.0 {
            debug!("re-orienting mirrored solid");
            mirrored.placed.not();
            mirrored.flipped = !mirrored.flipped;
        }
        let exact = self
            .exact_box(solid)
            .map(|bb| bb.mirrored(plane, base_point));
        Ok(self.store(mirrored, exact))
    }

    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<Aabb, KernelError> {
        Aabb::from_points(primitives::vertex_points(self.get_solid(solid)?)).ok_or_else(|| {
            KernelError::Other {
                message: "solid has no vertices".to_string(),
            }
        })
    }

    #[instrument(skip(self))]
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        tessellation::tessellate_solid(self.get_solid(solid)?, tolerance)
    }

    #[instrument(skip(self))]
    fn export_step(
        &mut self,
        solid: &KernelSolidHandle,
        name: &str,
    ) -> Result<String, KernelError> {
        let compressed = self.get_solid(solid)?.compress();
        let step = CompleteStepDisplay::new(
            StepModel::from(&compressed),
            StepHeaderDescriptor {
                file_name: name.to_owned(),
                organization_system: "door-pocket-mount".to_owned(),
                ..Default::default()
            },
        )
        .to_string();
        if step.is_empty() {
            return Err(KernelError::ExportFailed {
                reason: "STEP writer produced no output".to_string(),
            });
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_bb(bb: &Aabb, min: [f64; 3], max: [f64; 3]) {
        for i in 0..3 {
            assert_relative_eq!(bb.min[i], min[i], epsilon = 1e-6);
            assert_relative_eq!(bb.max[i], max[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_truck_kernel_box_bounds() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([2.0, 4.0, 6.0], [1.0, 0.0, 0.0]).unwrap();
        let bb = kernel.bounding_box(&h).unwrap();
        assert_bb(&bb, [0.0, -2.0, -3.0], [2.0, 2.0, 3.0]);
    }

    #[test]
    fn test_truck_kernel_rejects_degenerate_box() {
        let mut kernel = TruckKernel::new();
        let err = kernel.make_box([1.0, 0.0, 1.0], [0.0; 3]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_truck_kernel_fuses_stacked_boxes() {
        let mut kernel = TruckKernel::new();
        let block = kernel.make_box([4.0, 6.0, 10.0], [0.0; 3]).unwrap();
        let shelf = kernel.make_box([4.0, 6.0, 2.0], [0.0, 0.0, -6.0]).unwrap();
        let merged = kernel.boolean_union(&block, &shelf).unwrap();

        let solid = kernel.get_solid(&merged).unwrap();
        let faces: Vec<_> = solid.boundaries()[0].face_iter().collect();
        assert_eq!(faces.len(), 6, "Fused boxes should be a single box");

        let bb = kernel.bounding_box(&merged).unwrap();
        assert_bb(&bb, [-2.0, -3.0, -7.0], [2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_truck_kernel_subtract_offset() {
        let mut kernel = TruckKernel::new();
        let block = kernel.make_box([10.0, 10.0, 10.0], [0.0; 3]).unwrap();
        // Tool pokes out of the top face, no coplanar faces
        let tool = kernel.make_box([6.0, 6.0, 10.0], [0.0, 0.0, 5.0]).unwrap();
        let result = kernel.boolean_subtract(&block, &tool).unwrap();

        let solid = kernel.get_solid(&result).unwrap();
        let faces: Vec<_> = solid.boundaries()[0].face_iter().collect();
        assert!(faces.len() > 6, "Pocketed box should gain faces");

        let bb = kernel.bounding_box(&result).unwrap();
        assert_bb(&bb, [-5.0, -5.0, -5.0], [5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_truck_kernel_translate_keeps_input() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([1.0, 1.0, 1.0], [0.0; 3]).unwrap();
        let moved = kernel.translate(&h, [10.0, 0.0, -1.0]).unwrap();

        assert_bb(
            &kernel.bounding_box(&moved).unwrap(),
            [9.5, -0.5, -1.5],
            [10.5, 0.5, -0.5],
        );
        assert_bb(
            &kernel.bounding_box(&h).unwrap(),
            [-0.5, -0.5, -0.5],
            [0.5, 0.5, 0.5],
        );
    }

    #[test]
    fn test_truck_kernel_rotate_about_y() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([2.0, 1.0, 4.0], [0.0; 3]).unwrap();
        let r = kernel.rotate(&h, [0.0; 3], [0.0, 1.0, 0.0], 90.0).unwrap();
        let bb = kernel.bounding_box(&r).unwrap();
        assert_bb(&bb, [-2.0, -0.5, -1.0], [2.0, 0.5, 1.0]);
    }

    #[test]
    fn test_truck_kernel_moves_rotated_cut_result() {
        let mut kernel = TruckKernel::new();
        let block = kernel.make_box([10.0, 10.0, 10.0], [0.0; 3]).unwrap();
        let tool = kernel.make_box([6.0, 6.0, 10.0], [0.0, 0.0, 5.0]).unwrap();
        let cut = kernel.boolean_subtract(&block, &tool).unwrap();

        let offset = [-30.0, 0.0, 40.0];
        let tilted = kernel.rotate(&cut, [0.0; 3], [0.0, 1.0, 0.0], 20.0).unwrap();
        let placed = kernel.translate(&tilted, offset).unwrap();

        // Both maps land on the boolean result in a single transform
        let entry = kernel.entry(&placed).unwrap();
        let cut_faces = kernel.get_solid(&cut).unwrap().boundaries()[0].face_iter().count();
        assert_eq!(entry.source.boundaries()[0].face_iter().count(), cut_faces);

        let a = kernel.bounding_box(&tilted).unwrap();
        let b = kernel.bounding_box(&placed).unwrap();
        for i in 0..3 {
            assert_relative_eq!(b.min[i], a.min[i] + offset[i], epsilon = 1e-6);
            assert_relative_eq!(b.max[i], a.max[i] + offset[i], epsilon = 1e-6);
        }

        let volume = kernel.tessellate(&placed, 0.1).unwrap().signed_volume();
        assert_relative_eq!(volume, 1000.0 - 6.0 * 6.0 * 5.0, max_relative = 1e-3);
    }

    #[test]
    fn test_truck_kernel_moves_mirrored_cut_result() {
        let mut kernel = TruckKernel::new();
        let block = kernel.make_box([10.0, 10.0, 10.0], [8.0, 0.0, 0.0]).unwrap();
        let tool = kernel.make_box([6.0, 6.0, 10.0], [8.0, 0.0, 5.0]).unwrap();
        let cut = kernel.boolean_subtract(&block, &tool).unwrap();

        let mirrored = kernel.mirror(&cut, MirrorPlane::YZ, [0.0; 3]).unwrap();
        let placed = kernel.translate(&mirrored, [20.0, 0.0, 0.0]).unwrap();

        let bb = kernel.bounding_box(&placed).unwrap();
        assert_bb(&bb, [7.0, -5.0, -5.0], [17.0, 5.0, 5.0]);
        let volume = kernel.tessellate(&placed, 0.1).unwrap().signed_volume();
        assert_relative_eq!(volume, 820.0, max_relative = 1e-3);
    }

    #[test]
    fn test_truck_kernel_rotate_zero_axis() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([1.0, 1.0, 1.0], [0.0; 3]).unwrap();
        assert!(kernel.rotate(&h, [0.0; 3], [0.0; 3], 10.0).is_err());
    }

    #[test]
    fn test_truck_kernel_mirror_yz() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([2.0, 1.0, 1.0], [3.0, 0.0, 0.0]).unwrap();
        let m = kernel.mirror(&h, MirrorPlane::YZ, [0.0; 3]).unwrap();
        let bb = kernel.bounding_box(&m).unwrap();
        assert_bb(&bb, [-4.0, -0.5, -0.5], [-2.0, 0.5, 0.5]);
    }

    #[test]
    fn test_truck_kernel_mirror_keeps_outward_winding() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([2.0, 1.0, 1.0], [3.0, 0.0, 0.0]).unwrap();
        let m = kernel.mirror(&h, MirrorPlane::YZ, [0.0; 3]).unwrap();
        let mesh = kernel.tessellate(&m, 0.1).unwrap();

        assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_truck_kernel_step_export() {
        let mut kernel = TruckKernel::new();
        let h = kernel.make_box([1.0, 2.0, 3.0], [0.0; 3]).unwrap();
        let step = kernel.export_step(&h, "box.step").unwrap();
        assert!(step.starts_with("ISO-10303-21;"));
        assert!(step.contains("MANIFOLD_SOLID_BREP") || step.contains("CLOSED_SHELL"));
        assert!(step.trim_end().ends_with("END-ISO-10303-21;"));
    }

    #[test]
    fn test_truck_kernel_unknown_handle() {
        let kernel = TruckKernel::new();
        let err = kernel.bounding_box(&KernelSolidHandle(42)).unwrap_err();
        assert!(matches!(err, KernelError::EntityNotFound { handle: 42 }));
    }
}
