use serde::{Deserialize, Serialize};

/// Which door a mount is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Fixed output file stem, shared by every export format.
    pub fn file_stem(self) -> &'static str {
        match self {
            Side::Left => "JBL_Clip4_Pilot_LeftDoor",
            Side::Right => "JBL_Clip4_Pilot_RightDoor",
        }
    }

    /// Sign of the lateral (X) offset applied to this side's mount.
    pub fn lateral_sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}
