use super::spec::{EntityLevel, EntitySpec, MatchSpec};
use crate::core::criteria::{MatchAtom, MatchAtomType, MatchCriteria, MatchMol, MatchRes};
use crate::core::elements::proton_count;
use crate::core::ids::{NameId, ParamId, RelateId};
use crate::core::names::NameKind;
use crate::core::query::{AtomQuery, AtomTypeQuery, EntityQuery, MoleculeQuery, ResidueQuery};
use crate::core::scoring::Score;
use crate::engine::bindings::{BindKey, BindOutcome, BindValue};
use crate::engine::candidates::RelateIdMap;
use crate::engine::config::DatabaseConfig;
use crate::engine::error::{DatabaseError, Result};
use crate::engine::snapshot;
use crate::engine::state::DatabaseState;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::num::{NonZeroI32, NonZeroU8, NonZeroU32};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// A thread-safe parameter database.
///
/// All tables sit behind one reader-writer lock. Registration and binding
/// take the write lock, so the check-then-insert steps of interning and
/// deduplication are never interleaved; searches and resolutions share the
/// read lock and never observe a half-registered relationship.
#[derive(Debug, Default)]
pub struct ParameterDatabase {
    state: RwLock<DatabaseState>,
}

impl ParameterDatabase {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            state: RwLock::new(DatabaseState::new(config)),
        }
    }

    pub fn from_state(state: DatabaseState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        snapshot::load(path).map(Self::from_state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        snapshot::save(&self.state.read(), path)
    }

    pub fn add_table(&self, name: &str) {
        self.state.write().add_table(name);
    }

    pub fn table_names(&self) -> Vec<String> {
        self.state.read().tables.keys().cloned().collect()
    }

    pub fn intern(&self, kind: NameKind, raw: &str) -> NameId {
        self.state.write().intern(kind, raw)
    }

    /// Reverse lookup of an interned name. The wildcard has no name.
    pub fn name(&self, id: NameId) -> Option<String> {
        self.state.read().names.resolve(id).map(str::to_string)
    }

    /// Declares that residues named `residue` are also known as `alias`.
    pub fn add_alias(&self, alias: &str, residue: &str) {
        let mut state = self.state.write();
        let alias = state.intern(NameKind::ResidueAlias, alias);
        let residue = state.intern(NameKind::ResidueName, residue);
        state.add_alias(alias, residue);
    }

    pub fn register(&self, criteria: MatchCriteria) -> Result<RelateId> {
        self.state.write().relations.register(criteria)
    }

    /// Registers the relationship chain described by `spec` and returns the
    /// id of its most detailed link.
    #[instrument(skip(self), level = "debug")]
    pub fn register_spec(&self, spec: &MatchSpec) -> Result<RelateId> {
        if spec.has_atom_detail() && spec.has_atom_type_detail() {
            return Err(DatabaseError::InvalidSpec(
                "atom name/number and atom type/element cannot be combined".to_string(),
            ));
        }
        let residue_number = spec.residue_number.map(non_zero_residue).transpose()?;
        let atom_number = spec.atom_number.map(non_zero_atom).transpose()?;
        let protons = spec.element.as_deref().map(element).transpose()?;

        let mut state = self.state.write();
        let mut parent = RelateId::NULL;

        if spec.has_molecule_detail() {
            let criteria = MatchMol {
                name: intern_opt(&mut state, NameKind::MoleculeName, &spec.molecule),
                group: intern_opt(&mut state, NameKind::MoleculeGroup, &spec.group),
                state: intern_opt(&mut state, NameKind::MoleculeState, &spec.state),
            };
            parent = state.relations.register(criteria.into())?;
        }

        if spec.has_residue_detail() {
            let criteria = MatchRes {
                molecule: parent,
                name: intern_opt(&mut state, NameKind::ResidueName, &spec.residue),
                number: residue_number,
                alias: intern_opt(&mut state, NameKind::ResidueAlias, &spec.residue_alias),
                bonded: intern_all(&mut state, NameKind::AtomName, &spec.bonded),
                not_bonded: intern_all(&mut state, NameKind::AtomName, &spec.not_bonded),
            };
            parent = state.relations.register(criteria.into())?;
        }

        if spec.has_atom_detail() {
            let criteria = MatchAtom {
                parent,
                name: intern_opt(&mut state, NameKind::AtomName, &spec.atom),
                number: atom_number,
            };
            parent = state.relations.register(criteria.into())?;
        } else if spec.has_atom_type_detail() {
            let criteria = MatchAtomType {
                parent,
                type_name: intern_opt(&mut state, NameKind::AtomType, &spec.atom_type),
                protons,
            };
            parent = state.relations.register(criteria.into())?;
        }

        if parent.is_null() {
            parent = state.relations.register(MatchCriteria::Any)?;
        }
        Ok(parent)
    }

    /// Returns the criteria registered under `id`, or `None` (logged) when
    /// the id is unknown.
    pub fn lookup(&self, id: RelateId) -> Option<MatchCriteria> {
        let criteria = self.state.read().relations.lookup(id).cloned();
        if criteria.is_none() {
            warn!("Lookup of unknown relationship {}", id);
        }
        criteria
    }

    pub fn score(&self, id: RelateId) -> Option<Score> {
        self.state.read().relations.score(id)
    }

    pub fn relationship_count(&self) -> usize {
        self.state.read().relations.len()
    }

    /// Every relationship with its score and a readable description, in
    /// registration order.
    pub fn relationships(&self) -> Vec<(RelateId, Score, String)> {
        let state = self.state.read();
        state
            .relations
            .iter()
            .map(|(id, relationship)| {
                (
                    id,
                    relationship.score,
                    describe(&state, &relationship.criteria),
                )
            })
            .collect()
    }

    /// Builds a concrete query from strings. Names that were never interned
    /// cannot equal any stored criterion and are treated as absent.
    pub fn query(&self, spec: &EntitySpec) -> Result<EntityQuery> {
        let residue_number = spec.residue_number.map(non_zero_residue).transpose()?;
        let atom_number = spec.atom_number.map(non_zero_atom).transpose()?;
        let protons = spec.element.as_deref().map(element).transpose()?;

        let state = self.state.read();
        let find = |kind: NameKind, raw: &Option<String>| {
            raw.as_deref()
                .and_then(|raw| state.find_name(kind, raw))
                .unwrap_or(NameId::NULL)
        };
        let find_all = |kind: NameKind, raws: &[String]| -> BTreeSet<NameId> {
            raws.iter()
                .filter_map(|raw| state.find_name(kind, raw))
                .filter(|id| !id.is_null())
                .collect()
        };

        let molecule = MoleculeQuery {
            name: find(NameKind::MoleculeName, &spec.molecule),
            group: find(NameKind::MoleculeGroup, &spec.group),
            state: find(NameKind::MoleculeState, &spec.state),
        };
        if spec.level() == EntityLevel::Molecule {
            return Ok(molecule.into());
        }

        let name = find(NameKind::ResidueName, &spec.residue);
        let mut aliases = state.aliases_of(name);
        aliases.extend(find_all(NameKind::ResidueAlias, &spec.aliases));
        let residue = ResidueQuery {
            molecule,
            name,
            number: residue_number,
            aliases,
            bonded: find_all(NameKind::AtomName, &spec.bonded),
        };

        Ok(match spec.level() {
            EntityLevel::Molecule | EntityLevel::Residue => residue.into(),
            EntityLevel::Atom => AtomQuery {
                residue,
                name: find(NameKind::AtomName, &spec.atom),
                number: atom_number,
            }
            .into(),
            EntityLevel::AtomType => AtomTypeQuery {
                residue,
                type_name: find(NameKind::AtomType, &spec.atom_type),
                protons,
            }
            .into(),
        })
    }

    pub fn search(&self, query: &EntityQuery) -> RelateIdMap {
        self.state.read().relations.search(query)
    }

    /// Binds `key` to `value` in `table`. User ids are normalized with the
    /// user-id folding policy.
    pub fn bind(
        &self,
        table: &str,
        key: impl Into<BindKey>,
        value: impl Into<BindValue>,
    ) -> Result<BindOutcome> {
        let mut state = self.state.write();
        let key = match key.into() {
            BindKey::Relation(id) => {
                if state.relations.get(id).is_none() {
                    return Err(DatabaseError::UnknownRelationship(id));
                }
                BindKey::Relation(id)
            }
            BindKey::UserId(user_id) => {
                BindKey::UserId(state.normalize(NameKind::UserId, &user_id))
            }
        };
        let value = match value.into() {
            BindValue::UserId(user_id) => {
                BindValue::UserId(state.normalize(NameKind::UserId, &user_id))
            }
            param => param,
        };
        let outcome = state.table_mut(table)?.bind(key, value)?;
        debug!("Table '{}': bind outcome {:?}", table, outcome);
        Ok(outcome)
    }

    pub fn resolve(&self, table: &str, candidates: &RelateIdMap) -> Result<ParamId> {
        Ok(self.state.read().table(table)?.resolve(candidates))
    }

    /// Resolves a user id in `table`. A blank user id never has a binding
    /// (`bind` ignores it) and resolves to `NULL` with a warning.
    pub fn resolve_user_id(&self, table: &str, user_id: &str) -> Result<ParamId> {
        let state = self.state.read();
        let parameters = state.table(table)?;
        let user_id = state.normalize(NameKind::UserId, user_id);
        if user_id.is_empty() {
            warn!("Table '{}': blank user id resolves to no parameter", table);
            return Ok(ParamId::NULL);
        }
        Ok(parameters.resolve_user_id(&user_id))
    }

    /// Searches and resolves under a single read lock.
    pub fn resolve_entity(&self, table: &str, query: &EntityQuery) -> Result<ParamId> {
        let state = self.state.read();
        let table = state.table(table)?;
        let candidates = state.relations.search(query);
        Ok(table.resolve(&candidates))
    }
}

fn intern_opt(state: &mut DatabaseState, kind: NameKind, raw: &Option<String>) -> NameId {
    raw.as_deref()
        .map(|raw| state.intern(kind, raw))
        .unwrap_or(NameId::NULL)
}

fn intern_all(state: &mut DatabaseState, kind: NameKind, raws: &[String]) -> BTreeSet<NameId> {
    raws.iter()
        .map(|raw| state.intern(kind, raw))
        .filter(|id| !id.is_null())
        .collect()
}

fn non_zero_residue(number: i32) -> Result<NonZeroI32> {
    NonZeroI32::new(number)
        .ok_or_else(|| DatabaseError::InvalidSpec("residue numbers must be non-zero".to_string()))
}

fn non_zero_atom(number: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(number)
        .ok_or_else(|| DatabaseError::InvalidSpec("atom numbers must be non-zero".to_string()))
}

fn element(symbol: &str) -> Result<NonZeroU8> {
    proton_count(symbol)
        .ok_or_else(|| DatabaseError::InvalidSpec(format!("unknown element symbol '{}'", symbol)))
}

fn describe(state: &DatabaseState, criteria: &MatchCriteria) -> String {
    let name = |id: NameId| state.names.resolve(id).unwrap_or("?").to_string();
    let names = |ids: &BTreeSet<NameId>| {
        ids.iter()
            .map(|&id| name(id))
            .collect::<Vec<_>>()
            .join(",")
    };
    let mut fields = Vec::new();
    let mut push = |label: &str, value: String| fields.push(format!("{}={}", label, value));

    match criteria {
        MatchCriteria::Any => return "any".to_string(),
        MatchCriteria::Molecule(molecule) => {
            if !molecule.name.is_null() {
                push("name", name(molecule.name));
            }
            if !molecule.group.is_null() {
                push("group", name(molecule.group));
            }
            if !molecule.state.is_null() {
                push("state", name(molecule.state));
            }
        }
        MatchCriteria::Residue(residue) => {
            if !residue.molecule.is_null() {
                push("in", residue.molecule.to_string());
            }
            if !residue.name.is_null() {
                push("name", name(residue.name));
            }
            if let Some(number) = residue.number {
                push("number", number.to_string());
            }
            if !residue.alias.is_null() {
                push("alias", name(residue.alias));
            }
            if !residue.bonded.is_empty() {
                push("bonded", names(&residue.bonded));
            }
            if !residue.not_bonded.is_empty() {
                push("not-bonded", names(&residue.not_bonded));
            }
        }
        MatchCriteria::Atom(atom) => {
            if !atom.parent.is_null() {
                push("in", atom.parent.to_string());
            }
            if !atom.name.is_null() {
                push("name", name(atom.name));
            }
            if let Some(number) = atom.number {
                push("number", number.to_string());
            }
        }
        MatchCriteria::AtomType(atom_type) => {
            if !atom_type.parent.is_null() {
                push("in", atom_type.parent.to_string());
            }
            if !atom_type.type_name.is_null() {
                push("type", name(atom_type.type_name));
            }
            if let Some(protons) = atom_type.protons {
                push("protons", protons.to_string());
            }
        }
    }
    format!("{} [{}]", criteria.level(), fields.join(" "))
}
