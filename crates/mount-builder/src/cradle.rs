//! Tilted C-shaped cradle that holds the speaker body.

use mount_kernel::{cut_blind, FaceSelector, Kernel, KernelSolidHandle};
use mount_types::{DerivedDimensions, ParameterSet};
use tracing::{debug, info, instrument};

use crate::types::{BuildError, Stage};

const TILT_AXIS: [f64; 3] = [0.0, 1.0, 0.0];

/// Offset that puts the cradle's back face against the lip clamp's inner
/// channel wall, vertically centred on half the brace height.
pub fn cradle_placement(params: &ParameterSet, dims: &DerivedDimensions) -> [f64; 3] {
    [
        -(dims.lip_channel_width / 2.0 + params.lip_wall_thickness + dims.cradle_outer_depth / 2.0),
        0.0,
        dims.inner_brace_height / 2.0,
    ]
}

/// Build the cradle and place it in the lip clamp's frame.
///
/// The pocket is cut from the top (+Z) face of the block, so the cradle opens
/// upward and its floor sits `bottom_shelf_height` above the block's bottom,
/// with the shelf block closing the underside.
///
/// The bottom shelf is fused under the block before the pocket is cut. The
/// pocket never reaches the shelf, so the solid is the same as hollowing
/// first, and the fuse stays a face-to-face join of two boxes.
#[instrument(skip_all)]
pub fn build_cradle(
    kernel: &mut dyn Kernel,
    params: &ParameterSet,
    dims: &DerivedDimensions,
) -> Result<KernelSolidHandle, BuildError> {
    let err = BuildError::at;
    let half_body = params.clip_height / 2.0;
    let shelf = params.bottom_shelf_height;
    info!(
        outer_depth = dims.cradle_outer_depth,
        outer_width = dims.cradle_outer_width,
        tilt = params.tilt_angle_deg,
        "building cradle"
    );

    let block = kernel
        .make_box(
            [dims.cradle_outer_depth, dims.cradle_outer_width, half_body],
            [0.0, 0.0, 0.0],
        )
        .map_err(err(Stage::Cradle))?;

    let bottom_lip = kernel
        .make_box(
            [dims.cradle_outer_depth, dims.cradle_outer_width, shelf],
            [0.0, 0.0, 0.0],
        )
        .map_err(err(Stage::Cradle))?;
    let bottom_lip = kernel
        .translate(&bottom_lip, [0.0, 0.0, -(params.clip_height / 4.0 + shelf / 2.0)])
        .map_err(err(Stage::Cradle))?;

    let closed = kernel
        .boolean_union(&block, &bottom_lip)
        .map_err(err(Stage::Cradle))?;

    let hollow = cut_blind(
        kernel,
        &closed,
        FaceSelector::PosZ,
        [dims.cradle_inner_depth, dims.cradle_inner_width],
        half_body - shelf,
    )
    .map_err(err(Stage::Cradle))?;

    let tilted = kernel
        .rotate(&hollow, [0.0, 0.0, 0.0], TILT_AXIS, params.tilt_angle_deg)
        .map_err(err(Stage::Cradle))?;

    let offset = cradle_placement(params, dims);
    debug!(?offset, "placing cradle against lip clamp");
    kernel
        .translate(&tilted, offset)
        .map_err(err(Stage::Cradle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mount_kernel::MockKernel;
    use mount_types::derive;

    #[test]
    fn placement_with_default_parameters() {
        let p = ParameterSet::default();
        let d = derive(&p);
        let offset = cradle_placement(&p, &d);
        // 21.32/2 + 3 + 42.72/2
        assert_relative_eq!(offset[0], -35.02, epsilon = 1e-9);
        assert_relative_eq!(offset[1], 0.0);
        assert_relative_eq!(offset[2], 38.1, epsilon = 1e-9);
    }

    #[test]
    fn cradle_operations_run_in_order() {
        let p = ParameterSet::default();
        let d = derive(&p);
        let mut kernel = MockKernel::new();
        build_cradle(&mut kernel, &p, &d).unwrap();
        assert_eq!(
            kernel.log,
            vec!["box", "box", "translate", "union", "box", "subtract", "rotate", "translate"]
        );
    }

    #[test]
    fn untilted_cradle_envelope() {
        let p = ParameterSet {
            tilt_angle_deg: 0.0,
            ..ParameterSet::default()
        };
        let d = derive(&p);
        let mut kernel = MockKernel::new();
        let cradle = build_cradle(&mut kernel, &p, &d).unwrap();

        let bb = kernel.bounding_box(&cradle).unwrap();
        let offset = cradle_placement(&p, &d);
        assert_relative_eq!(bb.size()[0], d.cradle_outer_depth, epsilon = 1e-9);
        assert_relative_eq!(bb.size()[1], d.cradle_outer_width, epsilon = 1e-9);
        assert_relative_eq!(bb.size()[2], p.clip_height / 2.0 + p.bottom_shelf_height, epsilon = 1e-9);
        assert_relative_eq!(bb.max[0], offset[0] + d.cradle_outer_depth / 2.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max[2], offset[2] + p.clip_height / 4.0, epsilon = 1e-9);

        // Pocket floor leaves exactly one shelf of material above the block bottom
        let solid = kernel.solid(&cradle).unwrap();
        let pocket = &solid.terms[0].cuts[0];
        let floor = pocket.corners.iter().map(|c| c.z).fold(f64::MAX, f64::min);
        let block_bottom = offset[2] - p.clip_height / 4.0;
        assert_relative_eq!(floor, block_bottom + p.bottom_shelf_height, epsilon = 1e-9);
    }

    #[test]
    fn tilt_swings_top_toward_positive_x() {
        let p = ParameterSet::default();
        let d = derive(&p);
        let mut kernel = MockKernel::new();
        let cradle = build_cradle(&mut kernel, &p, &d).unwrap();
        let solid = kernel.solid(&cradle).unwrap();

        // Positive rotation about +Y carries +Z toward +X.
        let block = &solid.terms[0].material;
        let top = block.corners[4];
        let bottom = block.corners[0];
        assert!(top.z > bottom.z);
        assert!(top.x > bottom.x);
    }

    #[test]
    fn degenerate_pocket_depth_fails_in_kernel() {
        let p = ParameterSet {
            pocket_depth: 1.0,
            ..ParameterSet::default()
        };
        let d = derive(&p);
        let mut kernel = MockKernel::new();
        let err = build_cradle(&mut kernel, &p, &d).unwrap_err();
        assert_eq!(err.stage, Stage::Cradle);
    }
}
