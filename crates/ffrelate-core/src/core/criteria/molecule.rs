use super::name_matches;
use crate::core::ids::NameId;
use crate::core::query::MoleculeQuery;
use crate::core::scoring::{W_MOL_GROUP, W_MOL_NAME, W_MOL_STATE, flag};
use serde::{Deserialize, Serialize};

/// Molecule-level match criteria. A null field is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchMol {
    #[serde(default)]
    pub name: NameId,
    #[serde(default)]
    pub group: NameId,
    #[serde(default)]
    pub state: NameId,
}

impl MatchMol {
    pub fn named(name: NameId) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_null() && self.group.is_null() && self.state.is_null()
    }

    pub fn local_score(&self) -> u32 {
        flag(!self.name.is_null(), W_MOL_NAME)
            + flag(!self.group.is_null(), W_MOL_GROUP)
            + flag(!self.state.is_null(), W_MOL_STATE)
    }

    pub fn matches(&self, query: &MoleculeQuery) -> bool {
        name_matches(self.name, query.name)
            && name_matches(self.group, query.group)
            && name_matches(self.state, query.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: u32, group: u32) -> MoleculeQuery {
        MoleculeQuery {
            name: NameId::new(name),
            group: NameId::new(group),
            state: NameId::NULL,
        }
    }

    #[test]
    fn wildcard_fields_match_anything() {
        assert!(MatchMol::default().matches(&query(1, 2)));
        assert!(MatchMol::named(NameId::new(1)).matches(&query(1, 2)));
    }

    #[test]
    fn concrete_fields_must_be_equal() {
        assert!(!MatchMol::named(NameId::new(3)).matches(&query(1, 2)));
        let with_state = MatchMol {
            state: NameId::new(5),
            ..MatchMol::default()
        };
        assert!(!with_state.matches(&query(1, 2)));
    }

    #[test]
    fn name_outranks_group_and_state_together() {
        let by_name = MatchMol::named(NameId::new(1));
        let by_group_and_state = MatchMol {
            group: NameId::new(2),
            state: NameId::new(3),
            ..MatchMol::default()
        };
        assert!(by_name.local_score() > by_group_and_state.local_score());
        assert_eq!(MatchMol::default().local_score(), 0);
    }
}
