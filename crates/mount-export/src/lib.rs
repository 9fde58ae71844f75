pub mod artifact;
pub mod errors;
pub mod mesh_check;
pub mod step;
pub mod stl;

pub use artifact::{export_pair, write_artifact, ExportArtifact, ExportFormat, STL_TOLERANCE};
pub use errors::ExportError;
