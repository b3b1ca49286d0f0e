use crate::cli::{EntityArgs, ResolveArgs};
use crate::config::{LoadedDatabase, ParameterFile};
use crate::error::{CliError, Result};
use ffrelate::core::ids::RelateId;
use ffrelate::workflows::spec::EntitySpec;
use std::collections::HashMap;
use tracing::{info, warn};

impl From<EntityArgs> for EntitySpec {
    fn from(args: EntityArgs) -> Self {
        Self {
            molecule: args.molecule,
            group: args.group,
            state: args.state,
            residue: args.residue,
            residue_number: args.residue_number,
            aliases: args.aliases,
            bonded: args.bonded,
            atom: args.atom,
            atom_number: args.atom_number,
            atom_type: args.atom_type,
            element: args.element,
        }
    }
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let loaded = ParameterFile::from_file(&args.source.database)?.build()?;
    let spec = EntitySpec::from(args.entity);
    let lines = resolve_lines(&loaded, &args.table, &spec, args.explain)?;
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Resolves `spec` against `table` and renders the report printed by
/// `resolve`, candidates first when `explain` is set.
pub fn resolve_lines(
    loaded: &LoadedDatabase,
    table: &str,
    spec: &EntitySpec,
    explain: bool,
) -> Result<Vec<String>> {
    let values = loaded
        .values
        .get(table)
        .ok_or_else(|| CliError::Argument(format!("unknown parameter table '{}'", table)))?;

    let query = loaded.database.query(spec)?;
    info!("Resolving {:?} entity against table '{}'", spec.level(), table);

    let mut lines = Vec::new();
    if explain {
        let descriptions: HashMap<RelateId, String> = loaded
            .database
            .relationships()
            .into_iter()
            .map(|(id, _, description)| (id, description))
            .collect();
        let candidates = loaded.database.search(&query);
        lines.push(format!("{} candidate relationship(s):", candidates.len()));
        for (score, id) in candidates.iter_best_first() {
            let description = descriptions.get(&id).map(String::as_str).unwrap_or("?");
            lines.push(format!(
                "  {:<12} {:>14}  {}",
                id.to_string(),
                score.to_string(),
                description
            ));
        }
    }

    let param = loaded.database.resolve_entity(table, &query)?;
    match values.get(param) {
        Some(value) => lines.push(format!("{} = {}", table, value)),
        None => {
            warn!("No parameter in table '{}' for the given entity", table);
            lines.push(format!("{}: no parameter", table));
        }
    }
    Ok(lines)
}
