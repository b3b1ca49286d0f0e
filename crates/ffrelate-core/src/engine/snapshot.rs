use super::bindings::{BindKey, BindValue};
use super::config::DatabaseConfig;
use super::error::{DatabaseError, Result};
use super::state::DatabaseState;
use crate::core::criteria::MatchCriteria;
use crate::core::ids::{NameId, ParamId, RelateId};
use crate::core::names::{CaseFolding, NameInterner, NameKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    folding: Vec<FoldingRecord>,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    aliases: Vec<AliasRecord>,
    #[serde(default)]
    tables: Vec<TableRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FoldingRecord {
    kind: NameKind,
    folding: CaseFolding,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RelationshipRecord {
    id: RelateId,
    criteria: MatchCriteria,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct AliasRecord {
    residue: NameId,
    aliases: Vec<NameId>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TableRecord {
    name: String,
    #[serde(default)]
    relations: Vec<RelationBindingRecord>,
    #[serde(default)]
    user_ids: Vec<UserIdRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RelationBindingRecord {
    id: RelateId,
    value: BindValue,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct UserIdRecord {
    user_id: String,
    param: ParamId,
}

impl From<&DatabaseState> for Snapshot {
    fn from(state: &DatabaseState) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            folding: state
                .config
                .foldings()
                .map(|(kind, folding)| FoldingRecord { kind, folding })
                .collect(),
            names: state.names.names().to_vec(),
            relationships: state
                .relations
                .iter()
                .map(|(id, relationship)| RelationshipRecord {
                    id,
                    criteria: relationship.criteria.clone(),
                })
                .collect(),
            aliases: state
                .aliases
                .iter()
                .map(|(&residue, aliases)| AliasRecord {
                    residue,
                    aliases: aliases.iter().copied().collect(),
                })
                .collect(),
            tables: state
                .tables
                .values()
                .map(|table| TableRecord {
                    name: table.name().to_string(),
                    relations: table
                        .relation_bindings()
                        .map(|(id, value)| RelationBindingRecord {
                            id,
                            value: value.clone(),
                        })
                        .collect(),
                    user_ids: table
                        .user_id_bindings()
                        .into_iter()
                        .map(|(user_id, param)| UserIdRecord {
                            user_id: user_id.to_string(),
                            param,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl Snapshot {
    fn into_state(self) -> Result<DatabaseState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DatabaseError::CorruptSnapshot(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let config = self
            .folding
            .iter()
            .fold(DatabaseConfig::builder(), |builder, record| {
                builder.case_folding(record.kind, record.folding)
            })
            .build()?;
        let mut state = DatabaseState::new(config);
        state.names = NameInterner::from_names(self.names);

        for record in self.relationships {
            check_names(&state.names, record.criteria.name_ids())?;
            let id = state.relations.register(record.criteria)?;
            if id != record.id {
                return Err(DatabaseError::CorruptSnapshot(format!(
                    "relationship {} was reloaded as {}",
                    record.id, id
                )));
            }
        }

        for record in self.aliases {
            check_names(&state.names, [record.residue])?;
            check_names(&state.names, record.aliases.iter().copied())?;
            for alias in record.aliases {
                state.add_alias(alias, record.residue);
            }
        }

        for record in self.tables {
            if let Some(binding) = record
                .relations
                .iter()
                .find(|binding| state.relations.get(binding.id).is_none())
            {
                return Err(DatabaseError::CorruptSnapshot(format!(
                    "table '{}' binds unknown relationship {}",
                    record.name, binding.id
                )));
            }
            let table = state.add_table(&record.name);
            for binding in record.relations {
                table.bind(BindKey::Relation(binding.id), binding.value)?;
            }
            for binding in record.user_ids {
                table.bind(BindKey::UserId(binding.user_id), BindValue::Param(binding.param))?;
            }
        }
        Ok(state)
    }
}

fn check_names(names: &NameInterner, ids: impl IntoIterator<Item = NameId>) -> Result<()> {
    match ids.into_iter().find(|&id| names.resolve(id).is_none()) {
        Some(id) => Err(DatabaseError::CorruptSnapshot(format!(
            "name id {} is not in the name table ({} names)",
            id,
            names.len()
        ))),
        None => Ok(()),
    }
}

pub fn to_toml_string(state: &DatabaseState) -> Result<String> {
    Ok(toml::to_string(&Snapshot::from(state))?)
}

pub fn from_toml_str(content: &str, origin: &str) -> Result<DatabaseState> {
    let snapshot: Snapshot = toml::from_str(content).map_err(|e| DatabaseError::TomlRead {
        path: origin.to_string(),
        source: e,
    })?;
    snapshot.into_state()
}

pub fn save(state: &DatabaseState, path: &Path) -> Result<()> {
    let content = to_toml_string(state)?;
    std::fs::write(path, content).map_err(|e| DatabaseError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    info!(
        "Saved snapshot with {} relationships to {:?}",
        state.relations.len(),
        path
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<DatabaseState> {
    let content = std::fs::read_to_string(path).map_err(|e| DatabaseError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let state = from_toml_str(&content, &path.to_string_lossy())?;
    info!(
        "Loaded snapshot with {} relationships from {:?}",
        state.relations.len(),
        path
    );
    Ok(state)
}
