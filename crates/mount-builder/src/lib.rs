pub mod assembly;
pub mod cradle;
pub mod lip_clamp;
pub mod types;
pub mod viewer;

pub use assembly::{assemble, build_mounts};
pub use cradle::{build_cradle, cradle_placement};
pub use lip_clamp::build_lip_clamp;
pub use types::*;
pub use viewer::{LogViewer, Viewer};
