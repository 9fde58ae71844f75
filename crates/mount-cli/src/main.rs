use mount_cli::{init_tracing, output_dir, run_pipeline};
use mount_kernel::TruckKernel;
use mount_types::ParameterSet;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    init_tracing(Level::INFO);

    let dir = output_dir()?;
    println!("Exporting STL and STEP to: {}", dir.display());

    let mut kernel = TruckKernel::new();
    run_pipeline(&mut kernel, &ParameterSet::default(), &dir, None)?;

    println!("Done.");
    Ok(())
}
