use super::name_matches;
use crate::core::ids::{NameId, RelateId};
use crate::core::query::ResidueQuery;
use crate::core::scoring::{W_RES_ALIAS, W_RES_NAME, W_RES_NUMBER, bond_bonus, flag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroI32;

/// Residue-level match criteria.
///
/// The molecule part is not stored field by field: `molecule` embeds an
/// already registered molecule-level relationship (or `NULL` for any
/// molecule), which keeps scores composable across levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchRes {
    #[serde(default)]
    pub molecule: RelateId,
    #[serde(default)]
    pub name: NameId,
    #[serde(default)]
    pub number: Option<NonZeroI32>,
    #[serde(default)]
    pub alias: NameId,
    /// Atom names that must take part in inter-residue bonds.
    #[serde(default)]
    pub bonded: BTreeSet<NameId>,
    /// Atom names that must not take part in inter-residue bonds.
    #[serde(default)]
    pub not_bonded: BTreeSet<NameId>,
}

impl MatchRes {
    pub fn in_molecule(molecule: RelateId) -> Self {
        Self {
            molecule,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: NameId) -> Self {
        self.name = name;
        self
    }

    pub fn with_number(mut self, number: i32) -> Self {
        self.number = NonZeroI32::new(number);
        self
    }

    pub fn with_alias(mut self, alias: NameId) -> Self {
        self.alias = alias;
        self
    }

    pub fn must_bond(mut self, atom: NameId) -> Self {
        self.bonded.insert(atom);
        self
    }

    pub fn must_not_bond(mut self, atom: NameId) -> Self {
        self.not_bonded.insert(atom);
        self
    }

    /// True when no residue-level detail is set. The embedded molecule does
    /// not count.
    pub fn is_empty(&self) -> bool {
        self.name.is_null()
            && self.number.is_none()
            && self.alias.is_null()
            && self.bonded.is_empty()
            && self.not_bonded.is_empty()
    }

    pub fn local_score(&self) -> u32 {
        flag(self.number.is_some(), W_RES_NUMBER)
            + flag(!self.name.is_null(), W_RES_NAME)
            + flag(!self.alias.is_null(), W_RES_ALIAS)
            + bond_bonus(self.bonded.len())
            + bond_bonus(self.not_bonded.len())
    }

    pub fn matches(&self, query: &ResidueQuery) -> bool {
        name_matches(self.name, query.name)
            && self.number.is_none_or(|number| query.number == Some(number))
            && (self.alias.is_null() || query.aliases.contains(&self.alias))
            && self.bonded.is_subset(&query.bonded)
            && self.not_bonded.is_disjoint(&query.bonded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> BTreeSet<NameId> {
        raw.iter().copied().map(NameId::new).collect()
    }

    fn residue(name: u32, number: i32) -> ResidueQuery {
        ResidueQuery {
            name: NameId::new(name),
            number: NonZeroI32::new(number),
            ..ResidueQuery::default()
        }
    }

    #[test]
    fn number_and_name_must_agree_when_set() {
        let criteria = MatchRes::default().with_name(NameId::new(1)).with_number(5);
        assert!(criteria.matches(&residue(1, 5)));
        assert!(!criteria.matches(&residue(1, 6)));
        assert!(!criteria.matches(&residue(2, 5)));
    }

    #[test]
    fn alias_matches_only_residues_carrying_it() {
        let criteria = MatchRes::default().with_alias(NameId::new(9));
        let mut query = residue(1, 1);
        assert!(!criteria.matches(&query));
        query.aliases = ids(&[8, 9]);
        assert!(criteria.matches(&query));
    }

    #[test]
    fn bonding_constraints_check_the_bonded_set() {
        let criteria = MatchRes::default()
            .must_bond(NameId::new(10))
            .must_not_bond(NameId::new(11));
        let mut query = residue(1, 1);
        assert!(!criteria.matches(&query));
        query.bonded = ids(&[10]);
        assert!(criteria.matches(&query));
        query.bonded = ids(&[10, 11]);
        assert!(!criteria.matches(&query));
    }

    #[test]
    fn contradictory_bond_constraints_never_match() {
        let criteria = MatchRes::default()
            .must_bond(NameId::new(10))
            .must_not_bond(NameId::new(10));
        let mut query = residue(1, 1);
        query.bonded = ids(&[10]);
        assert!(!criteria.matches(&query));
    }

    #[test]
    fn exact_name_outranks_alias() {
        let exact = MatchRes::default().with_name(NameId::new(1));
        let alias = MatchRes::default()
            .with_alias(NameId::new(2))
            .must_bond(NameId::new(3))
            .must_not_bond(NameId::new(4));
        assert!(exact.local_score() > alias.local_score());
    }

    #[test]
    fn zero_number_is_treated_as_wildcard() {
        let criteria = MatchRes::default().with_number(0);
        assert!(criteria.is_empty());
        assert!(criteria.matches(&residue(1, 42)));
    }
}
