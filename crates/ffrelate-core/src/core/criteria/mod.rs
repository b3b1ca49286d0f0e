//! # Match Criteria Module
//!
//! Immutable value types describing partial-match predicates at the three
//! hierarchy levels of a molecular system: molecule, residue and atom.
//!
//! ## Overview
//!
//! Every criteria tuple is a set of optional fields. An unset field (a null
//! [`NameId`] or `None` number) is a wildcard. Finer levels never copy the
//! fields of a coarser level; they embed the [`RelateId`] of an already
//! registered coarser relationship instead:
//!
//! - [`MatchMol`] - molecule name, group and state
//! - [`MatchRes`] - embeds a molecule relationship, adds residue name,
//!   number, alias and inter-residue bonding constraints
//! - [`MatchAtom`] - embeds a molecule or residue relationship, adds atom
//!   name and number
//! - [`MatchAtomType`] - embeds a molecule or residue relationship, adds
//!   atom type and element
//!
//! [`MatchCriteria`] is the tagged union stored by the relationship store.
//! Its `Any` variant is the zero-criteria relationship that matches every
//! entity.

mod atom;
mod molecule;
mod residue;

pub use atom::{MatchAtom, MatchAtomType};
pub use molecule::MatchMol;
pub use residue::MatchRes;

use super::ids::{NameId, RelateId};
use super::query::EntityQuery;
use super::scoring::{Score, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CriteriaLevel {
    Any,
    Molecule,
    Residue,
    Atom,
    AtomType,
}

impl fmt::Display for CriteriaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CriteriaLevel::Any => "any",
            CriteriaLevel::Molecule => "molecule",
            CriteriaLevel::Residue => "residue",
            CriteriaLevel::Atom => "atom",
            CriteriaLevel::AtomType => "atom-type",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchCriteria {
    #[default]
    Any,
    Molecule(MatchMol),
    Residue(MatchRes),
    Atom(MatchAtom),
    AtomType(MatchAtomType),
}

/// Result of canonicalizing a criteria tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    /// The tuple carries its own detail and is registered as is.
    Criteria(MatchCriteria),
    /// The tuple adds nothing to its embedded parent and is the same
    /// relationship as the parent.
    SameAs(RelateId),
}

impl MatchCriteria {
    pub fn level(&self) -> CriteriaLevel {
        match self {
            MatchCriteria::Any => CriteriaLevel::Any,
            MatchCriteria::Molecule(_) => CriteriaLevel::Molecule,
            MatchCriteria::Residue(_) => CriteriaLevel::Residue,
            MatchCriteria::Atom(_) => CriteriaLevel::Atom,
            MatchCriteria::AtomType(_) => CriteriaLevel::AtomType,
        }
    }

    /// The embedded coarser relationship, `NULL` when there is none.
    pub fn parent(&self) -> RelateId {
        match self {
            MatchCriteria::Any | MatchCriteria::Molecule(_) => RelateId::NULL,
            MatchCriteria::Residue(residue) => residue.molecule,
            MatchCriteria::Atom(atom) => atom.parent,
            MatchCriteria::AtomType(atom_type) => atom_type.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: RelateId) {
        match self {
            MatchCriteria::Any | MatchCriteria::Molecule(_) => {}
            MatchCriteria::Residue(residue) => residue.molecule = parent,
            MatchCriteria::Atom(atom) => atom.parent = parent,
            MatchCriteria::AtomType(atom_type) => atom_type.parent = parent,
        }
    }

    /// Every non-null name referenced by the tuple, bond sets included.
    pub fn name_ids(&self) -> Vec<NameId> {
        let ids = match self {
            MatchCriteria::Any => Vec::new(),
            MatchCriteria::Molecule(molecule) => {
                vec![molecule.name, molecule.group, molecule.state]
            }
            MatchCriteria::Residue(residue) => [residue.name, residue.alias]
                .into_iter()
                .chain(residue.bonded.iter().copied())
                .chain(residue.not_bonded.iter().copied())
                .collect(),
            MatchCriteria::Atom(atom) => vec![atom.name],
            MatchCriteria::AtomType(atom_type) => vec![atom_type.type_name],
        };
        ids.into_iter().filter(|id| !id.is_null()).collect()
    }

    /// Whether the tuple sets any field at its own level.
    pub fn has_local_detail(&self) -> bool {
        match self {
            MatchCriteria::Any => false,
            MatchCriteria::Molecule(molecule) => !molecule.is_empty(),
            MatchCriteria::Residue(residue) => !residue.is_empty(),
            MatchCriteria::Atom(atom) => !atom.is_empty(),
            MatchCriteria::AtomType(atom_type) => !atom_type.is_empty(),
        }
    }

    /// Whether `parent_level` may be embedded in a tuple of this level.
    pub fn accepts_parent(&self, parent_level: CriteriaLevel) -> bool {
        match self {
            MatchCriteria::Any | MatchCriteria::Molecule(_) => false,
            MatchCriteria::Residue(_) => {
                matches!(parent_level, CriteriaLevel::Any | CriteriaLevel::Molecule)
            }
            MatchCriteria::Atom(_) | MatchCriteria::AtomType(_) => matches!(
                parent_level,
                CriteriaLevel::Any | CriteriaLevel::Molecule | CriteriaLevel::Residue
            ),
        }
    }

    pub fn canonical(self) -> Canonical {
        if self.has_local_detail() {
            return Canonical::Criteria(self);
        }
        let parent = self.parent();
        if parent.is_null() {
            Canonical::Criteria(MatchCriteria::Any)
        } else {
            Canonical::SameAs(parent)
        }
    }

    /// The score contributed by this tuple's own fields, excluding any
    /// embedded parent.
    pub fn local_score(&self) -> Score {
        match self {
            MatchCriteria::Any => Score::ZERO,
            MatchCriteria::Molecule(molecule) => {
                Score::at_tier(Tier::Molecule, molecule.local_score())
            }
            MatchCriteria::Residue(residue) => Score::at_tier(Tier::Residue, residue.local_score()),
            MatchCriteria::Atom(atom) => Score::at_tier(Tier::Atom, atom.local_score()),
            MatchCriteria::AtomType(atom_type) => {
                Score::at_tier(Tier::Atom, atom_type.local_score())
            }
        }
    }

    /// Checks this tuple's own fields against `query`. The embedded parent is
    /// checked separately by the relationship store.
    pub fn matches_local(&self, query: &EntityQuery) -> bool {
        match (self, query) {
            (MatchCriteria::Any, _) => true,
            (MatchCriteria::Molecule(molecule), query) => molecule.matches(query.molecule()),
            (MatchCriteria::Residue(residue), query) => {
                query.residue().is_some_and(|r| residue.matches(r))
            }
            (MatchCriteria::Atom(atom), EntityQuery::Atom(query)) => atom.matches(query),
            (MatchCriteria::AtomType(atom_type), EntityQuery::AtomType(query)) => {
                atom_type.matches(query)
            }
            _ => false,
        }
    }
}

impl From<MatchMol> for MatchCriteria {
    fn from(criteria: MatchMol) -> Self {
        MatchCriteria::Molecule(criteria)
    }
}

impl From<MatchRes> for MatchCriteria {
    fn from(criteria: MatchRes) -> Self {
        MatchCriteria::Residue(criteria)
    }
}

impl From<MatchAtom> for MatchCriteria {
    fn from(criteria: MatchAtom) -> Self {
        MatchCriteria::Atom(criteria)
    }
}

impl From<MatchAtomType> for MatchCriteria {
    fn from(criteria: MatchAtomType) -> Self {
        MatchCriteria::AtomType(criteria)
    }
}

pub(crate) fn name_matches(criterion: NameId, value: NameId) -> bool {
    criterion.is_null() || criterion == value
}
