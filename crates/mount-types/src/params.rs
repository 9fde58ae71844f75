use serde::{Deserialize, Serialize};

/// Millimetres per inch. Inch measurements are converted exactly once, when a
/// `ParameterSet` is built from them.
pub const MM_PER_INCH: f64 = 25.4;

/// Door-pocket measurements as taken with an imperial tape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InchMeasurements {
    /// Thickness of the door-pocket lip.
    pub lip_thickness: f64,
    /// Inside height of the pocket.
    pub pocket_height: f64,
    /// Inside depth of the pocket, lip to back wall.
    pub pocket_depth: f64,
}

impl InchMeasurements {
    /// Convert to millimetres: `(lip_thickness, pocket_height, pocket_depth)`.
    pub fn to_mm(&self) -> (f64, f64, f64) {
        (
            self.lip_thickness * MM_PER_INCH,
            self.pocket_height * MM_PER_INCH,
            self.pocket_depth * MM_PER_INCH,
        )
    }
}

impl Default for InchMeasurements {
    fn default() -> Self {
        Self {
            lip_thickness: 0.8,
            pocket_height: 6.0,
            pocket_depth: 1.8,
        }
    }
}

/// Every physical input of the mount, in millimetres and degrees.
///
/// Immutable once built; the derivation stage and every builder take it by
/// reference, so alternative parameter sets can be tested side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    // Door pocket
    pub lip_thickness: f64,
    pub pocket_height: f64,
    pub pocket_depth: f64,

    // Speaker body (width left-right, height top-bottom, depth front-back)
    pub clip_width: f64,
    pub clip_height: f64,
    pub clip_depth: f64,

    // Lip clamp
    pub lip_channel_clearance: f64,
    /// Height of the part that sits over the lip, above the pocket.
    pub lip_clamp_height: f64,
    pub lip_wall_thickness: f64,
    /// Lower bound for the brace below the channel.
    pub min_brace_height: f64,

    // Cradle
    pub cradle_clearance: f64,
    pub cradle_wall_thickness: f64,
    pub bottom_shelf_height: f64,
    /// Tilt toward the cabin, about the horizontal (Y) axis.
    pub tilt_angle_deg: f64,
    /// Clearance kept between the cradle and the pocket's back wall.
    pub back_gap: f64,

    // Assembly
    /// Extra width of the clamp beyond the cradle ("ears").
    pub mount_ear_allowance: f64,
    /// Gap added to half the cradle width when the pair is spread apart.
    pub mount_side_offset: f64,
}

impl ParameterSet {
    /// Build a parameter set from inch pocket measurements, keeping every
    /// other value at its default.
    pub fn from_inches(pocket: InchMeasurements) -> Self {
        Self::default().with_pocket_inches(pocket)
    }

    /// Replace the three pocket measurements with converted inch values.
    pub fn with_pocket_inches(mut self, pocket: InchMeasurements) -> Self {
        let (lip_thickness, pocket_height, pocket_depth) = pocket.to_mm();
        self.lip_thickness = lip_thickness;
        self.pocket_height = pocket_height;
        self.pocket_depth = pocket_depth;
        self
    }
}

impl Default for ParameterSet {
    /// JBL Clip 4 in a 0.8" / 6" / 1.8" door pocket.
    fn default() -> Self {
        let (lip_thickness, pocket_height, pocket_depth) = InchMeasurements::default().to_mm();
        Self {
            lip_thickness,
            pocket_height,
            pocket_depth,
            clip_width: 86.3,
            clip_height: 134.5,
            clip_depth: 46.0,
            lip_channel_clearance: 1.0,
            lip_clamp_height: 25.0,
            lip_wall_thickness: 3.0,
            min_brace_height: 40.0,
            cradle_clearance: 1.0,
            cradle_wall_thickness: 3.0,
            bottom_shelf_height: 8.0,
            tilt_angle_deg: 20.0,
            back_gap: 3.0,
            mount_ear_allowance: 4.0,
            mount_side_offset: 30.0,
        }
    }
}
