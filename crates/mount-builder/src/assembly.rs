//! Union of clamp and cradle, and the mirrored left/right pair.

use mount_kernel::{Kernel, KernelSolidHandle, MirrorPlane};
use mount_types::{derive, DerivedDimensions, ParameterSet, Side};
use tracing::{info, instrument, warn};

use crate::cradle::build_cradle;
use crate::lip_clamp::build_lip_clamp;
use crate::types::{BuildError, MountPair, Stage};
use crate::viewer::Viewer;

const ORIGIN: [f64; 3] = [0.0, 0.0, 0.0];

/// Fuse `lip` and `cradle` into the base mount and derive both door mounts
/// from it.
///
/// The right mount is mirrored from `base`, not from the left mount.
#[instrument(skip_all)]
pub fn assemble(
    kernel: &mut dyn Kernel,
    lip: &KernelSolidHandle,
    cradle: &KernelSolidHandle,
    dims: &DerivedDimensions,
) -> Result<MountPair, BuildError> {
    let err = BuildError::at;
    let base = kernel
        .boolean_union(lip, cradle)
        .map_err(err(Stage::Assembly))?;

    let offset = dims.side_offset;
    info!(offset, "placing left and right mounts");

    let left = kernel
        .translate(&base, [Side::Left.lateral_sign() * offset, 0.0, 0.0])
        .map_err(err(Stage::Assembly))?;

    let mirrored = kernel
        .mirror(&base, MirrorPlane::YZ, ORIGIN)
        .map_err(err(Stage::Assembly))?;
    let right = kernel
        .translate(&mirrored, [Side::Right.lateral_sign() * offset, 0.0, 0.0])
        .map_err(err(Stage::Assembly))?;

    Ok(MountPair {
        base,
        left,
        right,
        dims: *dims,
    })
}

/// Derive dimensions, build both parts, assemble the pair and offer each
/// mount to `viewer`. A failing preview is logged and never fails the build.
pub fn build_mounts(
    kernel: &mut dyn Kernel,
    params: &ParameterSet,
    viewer: Option<&mut dyn Viewer>,
) -> Result<MountPair, BuildError> {
    let dims = derive(params);
    let lip = build_lip_clamp(kernel, params, &dims)?;
    let cradle = build_cradle(kernel, params, &dims)?;
    let pair = assemble(kernel, &lip, &cradle, &dims)?;

    if let Some(viewer) = viewer {
        for side in Side::ALL {
            if let Err(e) = viewer.show(kernel, pair.get(side), side.file_stem()) {
                warn!(%side, error = %e, "preview failed");
            }
        }
    }
    Ok(pair)
}
