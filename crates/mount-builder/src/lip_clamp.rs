//! U-channel that grips the door-pocket lip.

use mount_kernel::{cut_blind, FaceSelector, Kernel, KernelSolidHandle};
use mount_types::{DerivedDimensions, ParameterSet};
use tracing::{info, instrument};

use crate::types::{BuildError, Stage};

/// Build the lip clamp centred on the origin.
///
/// A block `(channel + 2·wall) × mount_width × (clamp + brace)` with a slot
/// `channel × (mount_width − 2·wall)` cut `clamp` deep from its top face. The
/// brace below the slot stays solid.
#[instrument(skip_all)]
pub fn build_lip_clamp(
    kernel: &mut dyn Kernel,
    params: &ParameterSet,
    dims: &DerivedDimensions,
) -> Result<KernelSolidHandle, BuildError> {
    let size = dims.lip_block_size(params);
    info!(size = ?size, "building lip clamp");

    let block = kernel
        .make_box(size, [0.0, 0.0, 0.0])
        .map_err(BuildError::at(Stage::LipClamp))?;

    let slot = [
        dims.lip_channel_width,
        dims.mount_width - 2.0 * params.lip_wall_thickness,
    ];
    cut_blind(
        kernel,
        &block,
        FaceSelector::PosZ,
        slot,
        params.lip_clamp_height,
    )
    .map_err(BuildError::at(Stage::LipClamp))
}
