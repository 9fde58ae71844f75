//! Optional preview hook.

use mount_kernel::{Kernel, KernelError, KernelSolidHandle};
use tracing::info;

/// Receives finished solids for interactive preview.
///
/// Callers pass `Option<&mut dyn Viewer>`; `None` skips the preview and has
/// no effect on the geometry or the exported files.
pub trait Viewer {
    fn show(
        &mut self,
        kernel: &dyn Kernel,
        solid: &KernelSolidHandle,
        name: &str,
    ) -> Result<(), KernelError>;
}

/// Logs each solid's bounding box instead of drawing it.
#[derive(Debug, Default)]
pub struct LogViewer {
    /// Names shown so far.
    pub shown: Vec<String>,
}

impl Viewer for LogViewer {
    fn show(
        &mut self,
        kernel: &dyn Kernel,
        solid: &KernelSolidHandle,
        name: &str,
    ) -> Result<(), KernelError> {
        let bb = kernel.bounding_box(solid)?;
        info!(name, min = ?bb.min, max = ?bb.max, "preview");
        self.shown.push(name.to_string());
        Ok(())
    }
}
