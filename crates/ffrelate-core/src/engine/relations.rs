use super::candidates::RelateIdMap;
use super::error::{DatabaseError, Result};
use crate::core::criteria::{Canonical, CriteriaLevel, MatchCriteria};
use crate::core::ids::RelateId;
use crate::core::query::EntityQuery;
use crate::core::scoring::Score;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A registered relationship together with its cached specificity score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub criteria: MatchCriteria,
    pub score: Score,
}

/// Deduplicating registry of match criteria.
///
/// Every distinct canonical criteria tuple is stored once under a
/// [`RelateId`]. Relationships form a forest through their embedded parents,
/// which lets [`RelationshipStore::search`] skip whole subtrees whose parent
/// does not match the query.
#[derive(Debug, Clone, Default)]
pub struct RelationshipStore {
    /// Relationships in registration order; index `i` holds id `i + 1`.
    relationships: Vec<Relationship>,
    /// Exact-match index used to deduplicate registrations.
    index: HashMap<MatchCriteria, RelateId>,
    /// Child relationships keyed by embedded parent. Roots live under `NULL`.
    children: HashMap<RelateId, Vec<RelateId>>,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `criteria` and returns its id. Registering a tuple that is
    /// already known, or that adds nothing to its embedded parent, returns
    /// the existing id and leaves the store unchanged.
    pub fn register(&mut self, mut criteria: MatchCriteria) -> Result<RelateId> {
        let parent = criteria.parent();
        let mut parent_score = Score::ZERO;
        if !parent.is_null() {
            let parent_relationship = self
                .get(parent)
                .ok_or(DatabaseError::UnknownRelationship(parent))?;
            let parent_level = parent_relationship.criteria.level();
            if !criteria.accepts_parent(parent_level) {
                return Err(DatabaseError::InvalidParent {
                    child: criteria.level(),
                    parent: parent_level,
                    parent_id: parent,
                });
            }
            if parent_level == CriteriaLevel::Any {
                criteria.set_parent(RelateId::NULL);
            } else {
                parent_score = parent_relationship.score;
            }
        }

        let criteria = match criteria.canonical() {
            Canonical::SameAs(id) => return Ok(id),
            Canonical::Criteria(criteria) => criteria,
        };
        if let Some(&id) = self.index.get(&criteria) {
            trace!("Criteria already registered as {}", id);
            return Ok(id);
        }

        let id = RelateId::new(self.relationships.len() as u32 + 1);
        let score = parent_score + criteria.local_score();
        debug!(
            "Registered {} relationship {} with score {}",
            criteria.level(),
            id,
            score
        );
        self.children
            .entry(criteria.parent())
            .or_default()
            .push(id);
        self.index.insert(criteria.clone(), id);
        self.relationships.push(Relationship { criteria, score });
        Ok(id)
    }

    pub fn get(&self, id: RelateId) -> Option<&Relationship> {
        if id.is_null() {
            return None;
        }
        self.relationships.get(id.get() as usize - 1)
    }

    pub fn lookup(&self, id: RelateId) -> Option<&MatchCriteria> {
        self.get(id).map(|relationship| &relationship.criteria)
    }

    pub fn score(&self, id: RelateId) -> Option<Score> {
        self.get(id).map(|relationship| relationship.score)
    }

    /// Finds the id of an exact, already canonical criteria tuple.
    pub fn find(&self, criteria: &MatchCriteria) -> Option<RelateId> {
        self.index.get(criteria).copied()
    }

    /// Collects every relationship compatible with `query`, keyed by score.
    ///
    /// A relationship is compatible when its own fields match and its
    /// embedded parent, if any, is compatible as well. The walk starts at the
    /// roots and only descends below relationships that matched.
    pub fn search(&self, query: &EntityQuery) -> RelateIdMap {
        let mut result = RelateIdMap::new();
        let mut pending: Vec<RelateId> = self.children_of(RelateId::NULL).to_vec();
        while let Some(id) = pending.pop() {
            let Some(relationship) = self.get(id) else {
                continue;
            };
            if !relationship.criteria.matches_local(query) {
                continue;
            }
            result.insert(relationship.score, id);
            pending.extend_from_slice(self.children_of(id));
        }
        trace!(
            "Search matched {} of {} relationships",
            result.len(),
            self.relationships.len()
        );
        result
    }

    fn children_of(&self, id: RelateId) -> &[RelateId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates relationships in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (RelateId, &Relationship)> {
        self.relationships
            .iter()
            .enumerate()
            .map(|(index, relationship)| (RelateId::new(index as u32 + 1), relationship))
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{MatchAtom, MatchAtomType, MatchMol, MatchRes};
    use crate::core::ids::{NameId, ParamId};
    use crate::core::query::{AtomQuery, MoleculeQuery, ResidueQuery};
    use crate::engine::bindings::ParameterTable;
    use std::num::{NonZeroI32, NonZeroU32};

    const ALA: NameId = NameId::new(1);
    const GLY: NameId = NameId::new(2);
    const CA: NameId = NameId::new(3);

    fn residue_query(molecule: NameId, number: i32) -> ResidueQuery {
        ResidueQuery {
            molecule: MoleculeQuery {
                name: molecule,
                ..MoleculeQuery::default()
            },
            number: NonZeroI32::new(number),
            ..ResidueQuery::default()
        }
    }

    #[test]
    fn registering_same_criteria_twice_is_idempotent() {
        let mut store = RelationshipStore::new();
        let first = store.register(MatchMol::named(ALA).into()).unwrap();
        let second = store.register(MatchMol::named(ALA).into()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn distinct_criteria_get_distinct_ids() {
        let mut store = RelationshipStore::new();
        let ala = store.register(MatchMol::named(ALA).into()).unwrap();
        let gly = store.register(MatchMol::named(GLY).into()).unwrap();
        let ala_res = store
            .register(MatchRes::in_molecule(ala).with_number(5).into())
            .unwrap();
        let any_res = store
            .register(MatchRes::default().with_number(5).into())
            .unwrap();
        let ids = [ala, gly, ala_res, any_res];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn criteria_without_detail_resolve_to_their_parent() {
        let mut store = RelationshipStore::new();
        let ala = store.register(MatchMol::named(ALA).into()).unwrap();
        let same = store.register(MatchRes::in_molecule(ala).into()).unwrap();
        assert_eq!(same, ala);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_returns_registered_criteria() {
        let mut store = RelationshipStore::new();
        let id = store.register(MatchMol::named(ALA).into()).unwrap();
        assert_eq!(store.lookup(id), Some(&MatchCriteria::Molecule(MatchMol::named(ALA))));
        assert_eq!(store.lookup(RelateId::new(42)), None);
        assert_eq!(store.lookup(RelateId::NULL), None);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut store = RelationshipStore::new();
        let result = store.register(MatchRes::in_molecule(RelateId::new(9)).with_number(1).into());
        assert!(matches!(
            result,
            Err(DatabaseError::UnknownRelationship(id)) if id == RelateId::new(9)
        ));
    }

    #[test]
    fn residue_cannot_embed_residue() {
        let mut store = RelationshipStore::new();
        let residue = store
            .register(MatchRes::default().with_number(1).into())
            .unwrap();
        let result = store.register(MatchRes::in_molecule(residue).with_number(2).into());
        assert!(matches!(result, Err(DatabaseError::InvalidParent { .. })));
    }

    #[test]
    fn embedding_the_any_relationship_is_the_same_as_no_parent() {
        let mut store = RelationshipStore::new();
        let any = store.register(MatchCriteria::Any).unwrap();
        let via_any = store
            .register(MatchRes::in_molecule(any).with_number(3).into())
            .unwrap();
        let direct = store
            .register(MatchRes::default().with_number(3).into())
            .unwrap();
        assert_eq!(via_any, direct);
    }

    #[test]
    fn residue_score_includes_molecule_contribution() {
        let mut store = RelationshipStore::new();
        let ala = store.register(MatchMol::named(ALA).into()).unwrap();
        let scoped = store
            .register(MatchRes::in_molecule(ala).with_number(5).into())
            .unwrap();
        let unscoped = store
            .register(MatchRes::default().with_number(5).with_name(GLY).into())
            .unwrap();
        assert!(store.score(scoped).unwrap() > store.score(unscoped).unwrap());
        assert!(store.score(scoped).unwrap() > store.score(ala).unwrap());
    }

    #[test]
    fn search_returns_every_compatible_relationship() {
        let mut store = RelationshipStore::new();
        let any = store.register(MatchCriteria::Any).unwrap();
        let ala = store.register(MatchMol::named(ALA).into()).unwrap();
        let gly = store.register(MatchMol::named(GLY).into()).unwrap();
        let ala5 = store
            .register(MatchRes::in_molecule(ala).with_number(5).into())
            .unwrap();
        let gly5 = store
            .register(MatchRes::in_molecule(gly).with_number(5).into())
            .unwrap();
        let ala6 = store
            .register(MatchRes::in_molecule(ala).with_number(6).into())
            .unwrap();

        let found = store.search(&residue_query(ALA, 5).into());
        assert!(found.contains(any));
        assert!(found.contains(ala));
        assert!(found.contains(ala5));
        assert!(!found.contains(gly));
        assert!(!found.contains(gly5));
        assert!(!found.contains(ala6));
        assert_eq!(found.best().map(|(_, id)| id), Some(ala5));
        assert_eq!(found.score_of(ala5), store.score(ala5));
    }

    #[test]
    fn search_with_nothing_registered_is_empty() {
        let store = RelationshipStore::new();
        assert!(store.search(&residue_query(ALA, 1).into()).is_empty());
    }

    #[test]
    fn atom_search_walks_through_residue_parents() {
        let mut store = RelationshipStore::new();
        let ala = store.register(MatchMol::named(ALA).into()).unwrap();
        let res = store
            .register(MatchRes::in_molecule(ala).with_number(5).into())
            .unwrap();
        let atom = store
            .register(MatchAtom::within(res).with_name(CA).into())
            .unwrap();
        let typed = store
            .register(MatchAtomType::within(res).with_type(CA).into())
            .unwrap();

        let query = AtomQuery {
            residue: residue_query(ALA, 5),
            name: CA,
            number: NonZeroU32::new(1),
        };
        let found = store.search(&query.clone().into());
        assert!(found.contains(atom));
        assert!(!found.contains(typed));
        assert_eq!(found.best().map(|(_, id)| id), Some(atom));

        let elsewhere = AtomQuery {
            residue: residue_query(ALA, 6),
            ..query
        };
        assert!(!store.search(&elsewhere.into()).contains(atom));
    }

    #[test]
    fn equally_specific_matches_are_all_found_and_the_newest_wins() {
        let n = NameId::new(4);
        let c = NameId::new(5);
        let mut store = RelationshipStore::new();
        let bonds_n = store.register(MatchRes::default().must_bond(n).into()).unwrap();
        let avoids_c = store.register(MatchRes::default().must_not_bond(c).into()).unwrap();
        assert_eq!(store.score(bonds_n), store.score(avoids_c));

        let query = ResidueQuery {
            bonded: [n].into(),
            ..ResidueQuery::default()
        };
        let candidates = store.search(&query.into());
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains(bonds_n) && candidates.contains(avoids_c));
        assert_eq!(candidates.best().map(|(_, id)| id), Some(avoids_c));

        let mut table = ParameterTable::new("charge");
        table.bind(bonds_n.into(), ParamId::new(1).into()).unwrap();
        table.bind(avoids_c.into(), ParamId::new(2).into()).unwrap();
        assert_eq!(table.resolve(&candidates), ParamId::new(2));
    }
}
