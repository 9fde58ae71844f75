use crate::types::*;

/// Core geometry kernel trait. Every construction and transform takes its
/// inputs explicitly and returns a new handle; input handles stay valid and
/// unchanged.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Axis-aligned box of `size` (x, y, z) centred on `center`.
    fn make_box(
        &mut self,
        size: [f64; 3],
        center: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Rigid translation by `offset`.
    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Rotation by `angle_deg` (right-handed) about the axis through `origin`.
    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        origin: [f64; 3],
        axis: [f64; 3],
        angle_deg: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Reflection across `plane` passing through `base_point`.
    fn mirror(
        &mut self,
        solid: &KernelSolidHandle,
        plane: MirrorPlane,
        base_point: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Axis-aligned bounds of the solid.
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Result<Aabb, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Serialize a solid as a STEP (ISO 10303-21) document.
    fn export_step(&mut self, solid: &KernelSolidHandle, name: &str)
        -> Result<String, KernelError>;
}
