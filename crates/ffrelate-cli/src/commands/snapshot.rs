use crate::cli::SnapshotArgs;
use crate::config::ParameterFile;
use crate::error::Result;
use tracing::info;

pub fn run(args: SnapshotArgs) -> Result<()> {
    let loaded = ParameterFile::from_file(&args.source.database)?.build()?;
    loaded.database.save(&args.output)?;
    info!(
        "Snapshot of {} relationships written to {:?}",
        loaded.database.relationship_count(),
        &args.output
    );
    println!("Snapshot written to: {}", args.output.display());
    Ok(())
}
