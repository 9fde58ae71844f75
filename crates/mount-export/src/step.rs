use mount_kernel::{Kernel, KernelSolidHandle};

use crate::errors::ExportError;

const STEP_MAGIC: &str = "ISO-10303-21;";
const STEP_TRAILER: &str = "END-ISO-10303-21;";

/// Serialise `solid` as a STEP exchange file named `name`.
///
/// The kernel writes the text; this only checks it is framed as an
/// ISO-10303-21 file before anything reaches the disk.
pub fn render_step(
    kernel: &mut dyn Kernel,
    solid: &KernelSolidHandle,
    name: &str,
) -> Result<String, ExportError> {
    let text = kernel.export_step(solid, name)?;
    check_framing(&text, name)?;
    Ok(text)
}

fn check_framing(text: &str, name: &str) -> Result<(), ExportError> {
    let malformed = |reason: &str| ExportError::MalformedStep {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if !text.trim_start().starts_with(STEP_MAGIC) {
        return Err(malformed("missing ISO-10303-21 header"));
    }
    if !text.trim_end().ends_with(STEP_TRAILER) {
        return Err(malformed("missing END-ISO-10303-21 trailer"));
    }
    if !text.contains("DATA;") {
        return Err(malformed("no DATA section"));
    }
    Ok(())
}
