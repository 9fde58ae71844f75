use approx::assert_relative_eq;

use mount_kernel::{cut_blind, FaceSelector, Kernel, KernelError, MockKernel, TruckKernel};

// ── Blind cuts on the mock ──────────────────────────────────────────────────

#[test]
fn mock_cut_blind_adds_overshooting_tool() {
    let mut kernel = MockKernel::new();
    let block = kernel.make_box([10.0, 20.0, 30.0], [0.0; 3]).unwrap();
    let cut = cut_blind(&mut kernel, &block, FaceSelector::PosZ, [4.0, 6.0], 10.0).unwrap();

    let solid = kernel.solid(&cut).unwrap();
    assert_eq!(solid.terms[0].cuts.len(), 1);

    let tool = &solid.terms[0].cuts[0];
    let max_z = tool.corners.iter().map(|p| p.z).fold(f64::MIN, f64::max);
    let min_z = tool.corners.iter().map(|p| p.z).fold(f64::MAX, f64::min);
    assert!(max_z > 15.0, "tool must extend past the top face");
    assert_relative_eq!(min_z, 5.0, epsilon = 1e-9);
}

#[test]
fn cut_blind_rejects_non_positive_depth() {
    let mut kernel = MockKernel::new();
    let block = kernel.make_box([10.0, 10.0, 10.0], [0.0; 3]).unwrap();
    let err = cut_blind(&mut kernel, &block, FaceSelector::PosZ, [1.0, 1.0], 0.0).unwrap_err();
    assert!(matches!(err, KernelError::InvalidDimensions { .. }));
}

#[test]
fn cut_blind_propagates_negative_rect() {
    let mut kernel = MockKernel::new();
    let block = kernel.make_box([10.0, 10.0, 10.0], [0.0; 3]).unwrap();
    let err = cut_blind(&mut kernel, &block, FaceSelector::PosZ, [-2.9, 1.0], 2.0).unwrap_err();
    assert!(matches!(err, KernelError::InvalidDimensions { .. }));
}

// ── Blind cuts on truck ─────────────────────────────────────────────────────

#[test]
fn truck_cut_blind_slot_keeps_outer_bounds() {
    let mut kernel = TruckKernel::new();
    let block = kernel.make_box([27.0, 97.0, 100.0], [0.0; 3]).unwrap();
    let slot = cut_blind(&mut kernel, &block, FaceSelector::PosZ, [21.0, 91.0], 25.0).unwrap();

    let bb = kernel.bounding_box(&slot).unwrap();
    assert_relative_eq!(bb.min[2], -50.0, epsilon = 1e-6);
    assert_relative_eq!(bb.max[2], 50.0, epsilon = 1e-6);
    assert_relative_eq!(bb.size()[1], 97.0, epsilon = 1e-6);

    let mesh = kernel.tessellate(&slot, 0.1).unwrap();
    let expected = 27.0 * 97.0 * 100.0 - 21.0 * 91.0 * 25.0;
    assert_relative_eq!(mesh.signed_volume().abs(), expected, max_relative = 1e-3);
}

#[test]
fn truck_translated_copy_is_independent() {
    let mut kernel = TruckKernel::new();
    let a = kernel.make_box([1.0, 1.0, 1.0], [0.0; 3]).unwrap();
    let b = kernel.translate(&a, [5.0, 0.0, 0.0]).unwrap();
    assert_ne!(a, b);
    assert_relative_eq!(kernel.bounding_box(&a).unwrap().center()[0], 0.0);
    assert_relative_eq!(kernel.bounding_box(&b).unwrap().center()[0], 5.0);
}
