use crate::core::names::{CaseFolding, NameKind};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Parameter table names must not be empty")]
    EmptyTableName,
    #[error("Parameter table '{0}' is declared more than once")]
    DuplicateTable(String),
}

/// Settings for one parameter database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    folding: BTreeMap<NameKind, CaseFolding>,
    tables: Vec<String>,
}

impl DatabaseConfig {
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::new()
    }

    /// The case folding applied to names of `kind`.
    pub fn folding(&self, kind: NameKind) -> CaseFolding {
        self.folding
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_folding(kind))
    }

    pub fn foldings(&self) -> impl Iterator<Item = (NameKind, CaseFolding)> + '_ {
        NameKind::ALL.into_iter().map(|kind| (kind, self.folding(kind)))
    }

    /// Parameter tables created up front.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }
}

fn default_folding(kind: NameKind) -> CaseFolding {
    match kind {
        NameKind::UserId => CaseFolding::Sensitive,
        _ => CaseFolding::Insensitive,
    }
}

#[derive(Default)]
pub struct DatabaseConfigBuilder {
    folding: BTreeMap<NameKind, CaseFolding>,
    tables: Vec<String>,
}

impl DatabaseConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_folding(mut self, kind: NameKind, folding: CaseFolding) -> Self {
        self.folding.insert(kind, folding);
        self
    }

    pub fn case_sensitive(self, kind: NameKind, sensitive: bool) -> Self {
        let folding = if sensitive {
            CaseFolding::Sensitive
        } else {
            CaseFolding::Insensitive
        };
        self.case_folding(kind, folding)
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.tables.push(name.into());
        self
    }

    pub fn build(self) -> Result<DatabaseConfig, ConfigError> {
        let mut seen = HashSet::new();
        for table in &self.tables {
            if table.trim().is_empty() {
                return Err(ConfigError::EmptyTableName);
            }
            if !seen.insert(table.as_str()) {
                return Err(ConfigError::DuplicateTable(table.clone()));
            }
        }
        Ok(DatabaseConfig {
            folding: self.folding,
            tables: self.tables,
        })
    }
}
