use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::params::ParameterSet;

/// Smallest cradle depth the derivation will ever produce, in mm.
pub const MIN_CRADLE_DEPTH: f64 = 0.1;

/// Dimensions computed from a `ParameterSet`. All values in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedDimensions {
    /// Lip thickness plus channel clearance.
    pub lip_channel_width: f64,
    /// Solid brace below the channel; the cradle is centred on half of it.
    pub inner_brace_height: f64,
    /// Cradle depth before the pocket clamp is applied.
    pub ideal_cradle_outer_depth: f64,
    /// Intrusion into the pocket, after the clamp.
    pub cradle_outer_depth: f64,
    pub cradle_inner_depth: f64,
    pub cradle_inner_width: f64,
    pub cradle_outer_width: f64,
    /// Width of the lip clamp along the door.
    pub mount_width: f64,
    /// Lateral distance of each mount's origin from the world origin.
    pub side_offset: f64,
    /// True when the pocket depth, not the speaker, decided the cradle depth.
    pub depth_clamped: bool,
}

impl DerivedDimensions {
    /// Block size of the lip clamp: `(x, y, z)`.
    pub fn lip_block_size(&self, params: &ParameterSet) -> [f64; 3] {
        [
            self.lip_channel_width + 2.0 * params.lip_wall_thickness,
            self.mount_width,
            params.lip_clamp_height + self.inner_brace_height,
        ]
    }

    /// Space left for the cradle between the lip and the back wall.
    pub fn available_pocket_depth(params: &ParameterSet) -> f64 {
        params.pocket_depth - params.back_gap
    }
}

/// Clamp the cradle intrusion to `[MIN_CRADLE_DEPTH, available]`.
///
/// When `available` is itself below `MIN_CRADLE_DEPTH` the floor wins and a
/// near-zero cradle is produced rather than an error.
pub fn clamp_cradle_depth(ideal: f64, available: f64) -> f64 {
    ideal.max(MIN_CRADLE_DEPTH).min(available).max(MIN_CRADLE_DEPTH)
}

/// Compute every derived dimension. Pure; no validation beyond the cradle
/// depth clamp.
pub fn derive(params: &ParameterSet) -> DerivedDimensions {
    let lip_channel_width = params.lip_thickness + params.lip_channel_clearance;
    let inner_brace_height = params.min_brace_height.max(params.pocket_height / 2.0);

    let ideal_cradle_inner_depth = params.clip_depth + params.cradle_clearance;
    let ideal_cradle_outer_depth = ideal_cradle_inner_depth + params.cradle_wall_thickness;

    let available = DerivedDimensions::available_pocket_depth(params);
    let cradle_outer_depth = clamp_cradle_depth(ideal_cradle_outer_depth, available);
    let depth_clamped = cradle_outer_depth < ideal_cradle_outer_depth;
    let cradle_inner_depth = cradle_outer_depth - params.cradle_wall_thickness;

    let cradle_inner_width = params.clip_width + params.cradle_clearance;
    let cradle_outer_width = cradle_inner_width + 2.0 * params.cradle_wall_thickness;

    let mount_width = cradle_outer_width + params.mount_ear_allowance;
    let side_offset = cradle_outer_width / 2.0 + params.mount_side_offset;

    if depth_clamped {
        debug!(
            ideal = ideal_cradle_outer_depth,
            clamped = cradle_outer_depth,
            "cradle depth limited by pocket back wall"
        );
    }

    DerivedDimensions {
        lip_channel_width,
        inner_brace_height,
        ideal_cradle_outer_depth,
        cradle_outer_depth,
        cradle_inner_depth,
        cradle_inner_width,
        cradle_outer_width,
        mount_width,
        side_offset,
        depth_clamped,
    }
}
