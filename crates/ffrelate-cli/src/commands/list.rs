use crate::cli::DatabaseArgs;
use crate::config::{LoadedDatabase, ParameterFile};
use crate::error::Result;
use tracing::info;

pub fn run(args: DatabaseArgs) -> Result<()> {
    let loaded = ParameterFile::from_file(&args.database)?.build()?;
    for line in list_lines(&loaded) {
        println!("{}", line);
    }
    Ok(())
}

pub fn list_lines(loaded: &LoadedDatabase) -> Vec<String> {
    let relationships = loaded.database.relationships();
    info!("Listing {} relationships", relationships.len());

    let mut lines: Vec<String> = relationships
        .into_iter()
        .map(|(id, score, description)| {
            format!("{:<12} {:>14}  {}", id.to_string(), score.to_string(), description)
        })
        .collect();
    for (table, values) in &loaded.values {
        lines.push(format!("table '{}': {} distinct values", table, values.len()));
    }
    lines
}
