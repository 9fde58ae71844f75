use std::path::PathBuf;

use mount_kernel::KernelError;

/// Errors while turning solids into files on disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("geometry kernel: {0}")]
    Kernel(#[from] KernelError),

    #[error("refusing to export {name}: {reason}")]
    DegenerateMesh { name: String, reason: String },

    #[error("malformed STL: {reason}")]
    MalformedStl { reason: String },

    #[error("malformed STEP for {name}: {reason}")]
    MalformedStep { name: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
