use crate::error::{CliError, Result};
use ffrelate::core::names::{CaseFolding, NameKind};
use ffrelate::engine::config::DatabaseConfig;
use ffrelate::engine::library::ParameterLibrary;
use ffrelate::workflows::database::ParameterDatabase;
use ffrelate::workflows::spec::MatchSpec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialNamingConfig {
    molecule_names: Option<CaseFolding>,
    molecule_groups: Option<CaseFolding>,
    molecule_states: Option<CaseFolding>,
    residue_names: Option<CaseFolding>,
    residue_aliases: Option<CaseFolding>,
    atom_names: Option<CaseFolding>,
    atom_types: Option<CaseFolding>,
    user_ids: Option<CaseFolding>,
}

impl PartialNamingConfig {
    fn entries(&self) -> [(NameKind, Option<CaseFolding>); 8] {
        [
            (NameKind::MoleculeName, self.molecule_names),
            (NameKind::MoleculeGroup, self.molecule_groups),
            (NameKind::MoleculeState, self.molecule_states),
            (NameKind::ResidueName, self.residue_names),
            (NameKind::ResidueAlias, self.residue_aliases),
            (NameKind::AtomName, self.atom_names),
            (NameKind::AtomType, self.atom_types),
            (NameKind::UserId, self.user_ids),
        ]
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct AliasDeclaration {
    alias: String,
    residues: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RuleDeclaration {
    #[serde(rename = "match", default)]
    matching: MatchSpec,
    value: Option<f64>,
    user_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TableDeclaration {
    values_csv: Option<String>,
    #[serde(default)]
    values: BTreeMap<String, f64>,
    #[serde(default)]
    rules: Vec<RuleDeclaration>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct CsvValueRecord {
    user_id: String,
    value: f64,
}

/// A parameter database description as written in a TOML file.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ParameterFile {
    #[serde(default)]
    naming: PartialNamingConfig,
    #[serde(default)]
    aliases: Vec<AliasDeclaration>,
    #[serde(default)]
    tables: BTreeMap<String, TableDeclaration>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// A database together with the numeric values its `ParamId`s refer to, one
/// library per table.
pub struct LoadedDatabase {
    pub database: ParameterDatabase,
    pub values: BTreeMap<String, ParameterLibrary<f64>>,
}

impl ParameterFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading parameter database from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut file: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        file.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(file)
    }

    fn database_config(&self) -> Result<DatabaseConfig> {
        let builder = self
            .naming
            .entries()
            .into_iter()
            .filter_map(|(kind, folding)| folding.map(|folding| (kind, folding)))
            .fold(DatabaseConfig::builder(), |builder, (kind, folding)| {
                builder.case_folding(kind, folding)
            });
        let builder = self
            .tables
            .keys()
            .fold(builder, |builder, name| builder.table(name.clone()));
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn build(self) -> Result<LoadedDatabase> {
        let database = ParameterDatabase::new(self.database_config()?);

        for declaration in &self.aliases {
            for residue in &declaration.residues {
                database.add_alias(&declaration.alias, residue);
            }
        }

        let mut values = BTreeMap::new();
        for (table_name, table) in &self.tables {
            let mut library = ParameterLibrary::new();

            let mut named_values = match &table.values_csv {
                Some(csv_path) => self.load_values_csv(csv_path)?,
                None => Vec::new(),
            };
            named_values.extend(table.values.iter().map(|(id, value)| (id.clone(), *value)));
            for (user_id, value) in named_values {
                let param = library.add_unique(value);
                database.bind(table_name, user_id.as_str(), param)?;
            }

            for (index, rule) in table.rules.iter().enumerate() {
                let relate = database.register_spec(&rule.matching)?;
                match (rule.value, &rule.user_id) {
                    (Some(value), None) => {
                        let param = library.add_unique(value);
                        database.bind(table_name, relate, param)?;
                    }
                    (None, Some(user_id)) => {
                        database.bind(table_name, relate, user_id.as_str())?;
                    }
                    _ => {
                        return Err(CliError::Config(format!(
                            "rule {} of table '{}' must set exactly one of `value` or `user-id`",
                            index + 1,
                            table_name
                        )));
                    }
                }
            }

            info!(
                "Table '{}': {} rules, {} distinct values",
                table_name,
                table.rules.len(),
                library.len()
            );
            values.insert(table_name.clone(), library);
        }

        Ok(LoadedDatabase { database, values })
    }

    fn load_values_csv(&self, csv_path: &str) -> Result<Vec<(String, f64)>> {
        let path = self.base_dir.join(csv_path);
        debug!("Reading named parameter values from {:?}", path);
        let parse_error = |e: csv::Error| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        };
        let mut reader = csv::Reader::from_path(&path).map_err(parse_error)?;
        reader
            .deserialize::<CsvValueRecord>()
            .map(|record| {
                record
                    .map(|record| (record.user_id, record.value))
                    .map_err(parse_error)
            })
            .collect()
    }
}
