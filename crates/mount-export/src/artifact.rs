//! Output files: where each one goes and how it is produced.

use std::path::{Path, PathBuf};

use mount_builder::MountPair;
use mount_kernel::{Kernel, KernelSolidHandle};
use mount_types::Side;
use tracing::{debug, info, instrument};

use crate::errors::ExportError;
use crate::mesh_check::check_exportable;
use crate::step::render_step;
use crate::stl::{read_binary_stl, write_binary_stl};

/// Chordal tolerance, in mm, for STL tessellation.
pub const STL_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Stl,
    Step,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::Step => "step",
        }
    }
}

/// One file to be written for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub side: Side,
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl ExportArtifact {
    /// `<dir>/<side stem>.<ext>`.
    pub fn plan(dir: &Path, side: Side, format: ExportFormat) -> Self {
        let path = dir.join(format!("{}.{}", side.file_stem(), format.extension()));
        Self { side, path, format }
    }

    /// File name without its directory.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.side.file_stem(), self.format.extension())
    }
}

/// Produce the bytes for `artifact` from `solid` and write them.
///
/// STL output is checked before writing and read back once encoded; STEP
/// output is checked for ISO-10303-21 framing.
#[instrument(skip(kernel, solid), fields(path = %artifact.path.display()))]
pub fn write_artifact(
    kernel: &mut dyn Kernel,
    solid: &KernelSolidHandle,
    artifact: &ExportArtifact,
) -> Result<(), ExportError> {
    let name = artifact.file_name();
    let bytes = match artifact.format {
        ExportFormat::Stl => {
            let mesh = kernel.tessellate(solid, STL_TOLERANCE)?;
            let report = check_exportable(&mesh, &name)?;
            let bytes = write_binary_stl(&mesh, artifact.side.file_stem());
            let summary = read_binary_stl(&bytes)?;
            if summary.triangles != report.triangles {
                return Err(ExportError::MalformedStl {
                    reason: format!(
                        "wrote {} triangles, read back {}",
                        report.triangles, summary.triangles
                    ),
                });
            }
            debug!(
                triangles = report.triangles,
                volume = report.signed_volume,
                "mesh checked"
            );
            bytes
        }
        ExportFormat::Step => render_step(kernel, solid, &name)?.into_bytes(),
    };

    std::fs::write(&artifact.path, &bytes).map_err(|source| ExportError::Io {
        path: artifact.path.clone(),
        source,
    })?;
    info!(bytes = bytes.len(), "wrote {}", name);
    Ok(())
}

/// Write both mounts as STL, then both as STEP, into `dir`.
///
/// Stops at the first failure; files already written stay on disk.
pub fn export_pair(
    kernel: &mut dyn Kernel,
    pair: &MountPair,
    dir: &Path,
) -> Result<Vec<ExportArtifact>, ExportError> {
    let mut written = Vec::with_capacity(4);
    for format in [ExportFormat::Stl, ExportFormat::Step] {
        for side in Side::ALL {
            let artifact = ExportArtifact::plan(dir, side, format);
            write_artifact(kernel, pair.get(side), &artifact)?;
            written.push(artifact);
        }
    }
    Ok(written)
}
