use super::bindings::ParameterTable;
use super::config::DatabaseConfig;
use super::error::{DatabaseError, Result};
use super::relations::RelationshipStore;
use crate::core::ids::NameId;
use crate::core::names::{NameInterner, NameKind};
use std::collections::{BTreeMap, BTreeSet};

/// Every table of one parameter database.
///
/// This type is not synchronized; [`crate::workflows::database::ParameterDatabase`]
/// wraps it in a lock.
#[derive(Debug, Clone, Default)]
pub struct DatabaseState {
    pub config: DatabaseConfig,
    pub names: NameInterner,
    pub relations: RelationshipStore,
    pub tables: BTreeMap<String, ParameterTable>,
    /// Residue name to the aliases it is known by.
    pub aliases: BTreeMap<NameId, BTreeSet<NameId>>,
}

impl DatabaseState {
    pub fn new(config: DatabaseConfig) -> Self {
        let tables = config
            .tables()
            .iter()
            .map(|name| (name.clone(), ParameterTable::new(name.clone())))
            .collect();
        Self {
            config,
            tables,
            ..Self::default()
        }
    }

    pub fn normalize(&self, kind: NameKind, raw: &str) -> String {
        self.config.folding(kind).apply(raw)
    }

    pub fn intern(&mut self, kind: NameKind, raw: &str) -> NameId {
        let normalized = self.normalize(kind, raw);
        self.names.intern(&normalized)
    }

    /// Looks a name up without interning it. A name that was never interned
    /// cannot equal any stored criterion, so callers may treat `None` as a
    /// value that matches wildcards only.
    pub fn find_name(&self, kind: NameKind, raw: &str) -> Option<NameId> {
        self.names.get(&self.normalize(kind, raw))
    }

    pub fn add_table(&mut self, name: &str) -> &mut ParameterTable {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| ParameterTable::new(name))
    }

    pub fn table(&self, name: &str) -> Result<&ParameterTable> {
        self.tables
            .get(name)
            .ok_or_else(|| DatabaseError::UnknownTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut ParameterTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DatabaseError::UnknownTable(name.to_string()))
    }

    pub fn add_alias(&mut self, alias: NameId, residue: NameId) {
        if alias.is_null() || residue.is_null() {
            return;
        }
        self.aliases.entry(residue).or_default().insert(alias);
    }

    pub fn aliases_of(&self, residue: NameId) -> BTreeSet<NameId> {
        self.aliases.get(&residue).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::names::CaseFolding;

    #[test]
    fn configured_tables_exist_up_front() {
        let config = DatabaseConfig::builder().table("charge").build().unwrap();
        let state = DatabaseState::new(config);
        assert!(state.table("charge").is_ok());
        assert!(matches!(state.table("lj"), Err(DatabaseError::UnknownTable(_))));
    }

    #[test]
    fn interning_applies_the_namespace_folding() {
        let config = DatabaseConfig::builder()
            .case_folding(NameKind::ResidueAlias, CaseFolding::Sensitive)
            .build()
            .unwrap();
        let mut state = DatabaseState::new(config);
        let name = state.intern(NameKind::ResidueName, "ala");
        assert_eq!(state.intern(NameKind::ResidueName, "ALA"), name);
        let alias = state.intern(NameKind::ResidueAlias, "Amino");
        assert_ne!(state.intern(NameKind::ResidueAlias, "AMINO"), alias);
    }

    #[test]
    fn find_name_does_not_intern() {
        let state = DatabaseState::default();
        assert_eq!(state.find_name(NameKind::AtomName, "CA"), None);
        assert!(state.names.is_empty());
    }

    #[test]
    fn aliases_accumulate_per_residue() {
        let mut state = DatabaseState::default();
        let ala = state.intern(NameKind::ResidueName, "ALA");
        let amino = state.intern(NameKind::ResidueAlias, "AMINO");
        let small = state.intern(NameKind::ResidueAlias, "SMALL");
        state.add_alias(amino, ala);
        state.add_alias(small, ala);
        state.add_alias(NameId::NULL, ala);
        assert_eq!(state.aliases_of(ala), BTreeSet::from([amino, small]));
    }
}
