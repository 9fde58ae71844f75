//! Build the left and right door mounts and write them next to the binary.

pub mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::Context;
use mount_builder::{build_mounts, Viewer};
use mount_export::{export_pair, ExportArtifact};
use mount_kernel::Kernel;
use mount_types::ParameterSet;
use tracing::info;

pub use telemetry::init_tracing;

/// Directory containing the running executable.
pub fn output_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.to_path_buf())
}

/// Build both mounts from `params` and export the four files into `dir`.
pub fn run_pipeline(
    kernel: &mut dyn Kernel,
    params: &ParameterSet,
    dir: &Path,
    viewer: Option<&mut dyn Viewer>,
) -> anyhow::Result<Vec<ExportArtifact>> {
    let pair = build_mounts(kernel, params, viewer).context("building mounts")?;
    info!(
        mount_width = pair.dims.mount_width,
        cradle_depth = pair.dims.cradle_outer_depth,
        "mounts built"
    );
    let written = export_pair(kernel, &pair, dir)
        .with_context(|| format!("exporting to {}", dir.display()))?;
    Ok(written)
}
