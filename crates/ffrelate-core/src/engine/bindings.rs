use super::candidates::RelateIdMap;
use super::error::{DatabaseError, Result};
use crate::core::ids::{ParamId, RelateId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace, warn};

/// What a parameter is bound from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindKey {
    Relation(RelateId),
    UserId(String),
}

/// What a key is bound to: a parameter, or a user id resolved in a second
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindValue {
    Param(ParamId),
    UserId(String),
}

impl From<RelateId> for BindKey {
    fn from(id: RelateId) -> Self {
        BindKey::Relation(id)
    }
}

impl From<&str> for BindKey {
    fn from(user_id: &str) -> Self {
        BindKey::UserId(user_id.to_string())
    }
}

impl From<String> for BindKey {
    fn from(user_id: String) -> Self {
        BindKey::UserId(user_id)
    }
}

impl From<ParamId> for BindValue {
    fn from(id: ParamId) -> Self {
        BindValue::Param(id)
    }
}

impl From<&str> for BindValue {
    fn from(user_id: &str) -> Self {
        BindValue::UserId(user_id.to_string())
    }
}

impl From<String> for BindValue {
    fn from(user_id: String) -> Self {
        BindValue::UserId(user_id)
    }
}

/// What a call to [`ParameterTable::bind`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Inserted,
    Unchanged,
    /// An existing binding was overwritten; holds the previous value.
    Replaced(BindValue),
    /// Nothing to bind (empty user id).
    Ignored,
}

/// Parameter bindings for one kind of parameter (charges, Lennard-Jones
/// terms, ...). Relationships are shared between tables; bindings are not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    name: String,
    relations: BTreeMap<RelateId, BindValue>,
    user_ids: HashMap<String, ParamId>,
}

impl ParameterTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `key` to `value`, replacing any previous binding of `key`.
    ///
    /// Relationship bindings are replaced silently. Rebinding a user id to a
    /// different parameter logs a warning. A user id can never be bound to another user id.
    pub fn bind(&mut self, key: BindKey, value: BindValue) -> Result<BindOutcome> {
        match (key, value) {
            (BindKey::Relation(id), _) if id.is_null() => {
                Err(DatabaseError::UnknownRelationship(id))
            }
            (BindKey::Relation(_), BindValue::UserId(user_id)) if user_id.is_empty() => {
                Ok(BindOutcome::Ignored)
            }
            (BindKey::Relation(id), value) => {
                trace!("Table '{}': binding {} to {:?}", self.name, id, value);
                Ok(match self.relations.insert(id, value.clone()) {
                    None => BindOutcome::Inserted,
                    Some(previous) if previous == value => BindOutcome::Unchanged,
                    Some(previous) => BindOutcome::Replaced(previous),
                })
            }
            (BindKey::UserId(user_id), BindValue::Param(_)) if user_id.is_empty() => {
                Ok(BindOutcome::Ignored)
            }
            (BindKey::UserId(user_id), BindValue::Param(param)) => {
                match self.user_ids.get(&user_id).copied() {
                    Some(previous) if previous == param => Ok(BindOutcome::Unchanged),
                    Some(previous) => {
                        warn!(
                            "Table '{}': user id '{}' is rebound from {} to {}",
                            self.name, user_id, previous, param
                        );
                        self.user_ids.insert(user_id, param);
                        Ok(BindOutcome::Replaced(BindValue::Param(previous)))
                    }
                    None => {
                        self.user_ids.insert(user_id, param);
                        Ok(BindOutcome::Inserted)
                    }
                }
            }
            (BindKey::UserId(from), BindValue::UserId(to)) => {
                Err(DatabaseError::NestedIndirection { from, to })
            }
        }
    }

    /// The direct binding of a relationship: either a parameter, or a user id
    /// still to be resolved. `(NULL, None)` when the relationship is unbound.
    pub fn resolve_direct(&self, id: RelateId) -> (ParamId, Option<&str>) {
        match self.relations.get(&id) {
            Some(BindValue::Param(param)) => (*param, None),
            Some(BindValue::UserId(user_id)) => (ParamId::NULL, Some(user_id.as_str())),
            None => (ParamId::NULL, None),
        }
    }

    pub fn resolve_user_id(&self, user_id: &str) -> ParamId {
        match self.user_ids.get(user_id) {
            Some(&param) => param,
            None => {
                warn!("Table '{}': no parameter bound to user id '{}'", self.name, user_id);
                ParamId::NULL
            }
        }
    }

    /// Resolves candidates most-specific first and returns the first bound
    /// parameter, following at most one user-id indirection per candidate.
    pub fn resolve(&self, candidates: &RelateIdMap) -> ParamId {
        for (score, id) in candidates.iter_best_first() {
            let param = match self.resolve_direct(id) {
                (param, _) if !param.is_null() => param,
                (_, Some(user_id)) => self.resolve_user_id(user_id),
                _ => continue,
            };
            if !param.is_null() {
                debug!(
                    "Table '{}': resolved {} (score {}) to {}",
                    self.name, id, score, param
                );
                return param;
            }
        }
        ParamId::NULL
    }

    pub fn relation_bindings(&self) -> impl Iterator<Item = (RelateId, &BindValue)> {
        self.relations.iter().map(|(&id, value)| (id, value))
    }

    /// User-id bindings sorted by user id.
    pub fn user_id_bindings(&self) -> Vec<(&str, ParamId)> {
        let mut bindings: Vec<_> = self
            .user_ids
            .iter()
            .map(|(user_id, &param)| (user_id.as_str(), param))
            .collect();
        bindings.sort_unstable();
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::Score;

    fn map(entries: &[(u64, u32)]) -> RelateIdMap {
        entries
            .iter()
            .map(|&(score, id)| (Score::from(score), RelateId::new(id)))
            .collect()
    }

    #[test]
    fn empty_map_resolves_to_null() {
        let table = ParameterTable::new("charge");
        assert_eq!(table.resolve(&RelateIdMap::new()), ParamId::NULL);
    }

    #[test]
    fn most_specific_binding_wins() {
        let mut table = ParameterTable::new("charge");
        table.bind(RelateId::new(1).into(), ParamId::new(1).into()).unwrap();
        table.bind(RelateId::new(2).into(), ParamId::new(2).into()).unwrap();
        assert_eq!(table.resolve(&map(&[(100, 1), (50, 2)])), ParamId::new(1));
    }

    #[test]
    fn unbound_candidates_fall_through_to_lower_scores() {
        let mut table = ParameterTable::new("charge");
        table.bind(RelateId::new(2).into(), ParamId::new(2).into()).unwrap();
        assert_eq!(table.resolve(&map(&[(200, 3), (50, 2)])), ParamId::new(2));
    }

    #[test]
    fn user_id_indirection_is_followed_once() {
        let mut table = ParameterTable::new("charge");
        table.bind(RelateId::new(7).into(), "OPLS".into()).unwrap();
        table.bind("OPLS".into(), ParamId::new(42).into()).unwrap();
        assert_eq!(table.resolve_direct(RelateId::new(7)), (ParamId::NULL, Some("OPLS")));
        assert_eq!(table.resolve(&map(&[(100, 7)])), ParamId::new(42));
    }

    #[test]
    fn dangling_user_id_falls_through() {
        let mut table = ParameterTable::new("charge");
        table.bind(RelateId::new(7).into(), "MISSING".into()).unwrap();
        table.bind(RelateId::new(3).into(), ParamId::new(5).into()).unwrap();
        assert_eq!(table.resolve(&map(&[(100, 7), (10, 3)])), ParamId::new(5));
    }

    #[test]
    fn no_bound_candidates_resolve_to_null() {
        let table = ParameterTable::new("charge");
        assert_eq!(table.resolve(&map(&[(100, 1), (50, 2)])), ParamId::NULL);
    }

    #[test]
    fn rebinding_user_id_replaces_and_reports_previous() {
        let mut table = ParameterTable::new("charge");
        assert_eq!(
            table.bind("X".into(), ParamId::new(1).into()).unwrap(),
            BindOutcome::Inserted
        );
        assert_eq!(
            table.bind("X".into(), ParamId::new(2).into()).unwrap(),
            BindOutcome::Replaced(BindValue::Param(ParamId::new(1)))
        );
        assert_eq!(table.resolve_user_id("X"), ParamId::new(2));
    }

    #[test]
    fn rebinding_user_id_to_same_param_is_a_no_op() {
        let mut table = ParameterTable::new("charge");
        table.bind("X".into(), ParamId::new(1).into()).unwrap();
        assert_eq!(
            table.bind("X".into(), ParamId::new(1).into()).unwrap(),
            BindOutcome::Unchanged
        );
    }

    #[test]
    fn empty_user_id_is_ignored() {
        let mut table = ParameterTable::new("charge");
        assert_eq!(
            table.bind("".into(), ParamId::new(1).into()).unwrap(),
            BindOutcome::Ignored
        );
        assert!(table.user_id_bindings().is_empty());
    }

    #[test]
    fn relation_binding_switches_between_param_and_user_id() {
        let mut table = ParameterTable::new("charge");
        table.bind(RelateId::new(1).into(), ParamId::new(9).into()).unwrap();
        let outcome = table.bind(RelateId::new(1).into(), "OPLS".into()).unwrap();
        assert_eq!(outcome, BindOutcome::Replaced(BindValue::Param(ParamId::new(9))));
        assert_eq!(table.resolve_direct(RelateId::new(1)), (ParamId::NULL, Some("OPLS")));
    }

    #[test]
    fn user_id_to_user_id_is_rejected() {
        let mut table = ParameterTable::new("charge");
        let result = table.bind("A".into(), "B".into());
        assert!(matches!(result, Err(DatabaseError::NestedIndirection { .. })));
    }

    #[test]
    fn binding_null_relationship_is_rejected() {
        let mut table = ParameterTable::new("charge");
        let result = table.bind(RelateId::NULL.into(), ParamId::new(1).into());
        assert!(matches!(result, Err(DatabaseError::UnknownRelationship(_))));
    }

    #[test]
    fn unknown_user_id_resolves_to_null() {
        let table = ParameterTable::new("charge");
        assert_eq!(table.resolve_user_id("nope"), ParamId::NULL);
    }
}
