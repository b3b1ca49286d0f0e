use super::name_matches;
use crate::core::ids::{NameId, RelateId};
use crate::core::query::{AtomQuery, AtomTypeQuery};
use crate::core::scoring::{W_ATOM_NAME, W_ATOM_NUMBER, W_ELEMENT, W_TYPE_NAME, flag};
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU8, NonZeroU32};

/// Atom criteria scoped by an embedded molecule or residue relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchAtom {
    #[serde(default)]
    pub parent: RelateId,
    #[serde(default)]
    pub name: NameId,
    #[serde(default)]
    pub number: Option<NonZeroU32>,
}

impl MatchAtom {
    pub fn within(parent: RelateId) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: NameId) -> Self {
        self.name = name;
        self
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = NonZeroU32::new(number);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_null() && self.number.is_none()
    }

    pub fn local_score(&self) -> u32 {
        flag(self.number.is_some(), W_ATOM_NUMBER) + flag(!self.name.is_null(), W_ATOM_NAME)
    }

    pub fn matches(&self, query: &AtomQuery) -> bool {
        name_matches(self.name, query.name)
            && self.number.is_none_or(|number| query.number == Some(number))
    }
}

/// Atom-type criteria scoped by an embedded molecule or residue relationship.
/// An unset proton count matches any element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MatchAtomType {
    #[serde(default)]
    pub parent: RelateId,
    #[serde(default)]
    pub type_name: NameId,
    #[serde(default)]
    pub protons: Option<NonZeroU8>,
}

impl MatchAtomType {
    pub fn within(parent: RelateId) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_name: NameId) -> Self {
        self.type_name = type_name;
        self
    }

    pub fn with_protons(mut self, protons: u8) -> Self {
        self.protons = NonZeroU8::new(protons);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.type_name.is_null() && self.protons.is_none()
    }

    pub fn local_score(&self) -> u32 {
        flag(!self.type_name.is_null(), W_TYPE_NAME) + flag(self.protons.is_some(), W_ELEMENT)
    }

    pub fn matches(&self, query: &AtomTypeQuery) -> bool {
        name_matches(self.type_name, query.type_name)
            && self.protons.is_none_or(|protons| query.protons == Some(protons))
    }
}
