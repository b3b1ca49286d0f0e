use super::ids::NameId;
use std::collections::BTreeSet;
use std::num::{NonZeroI32, NonZeroU8, NonZeroU32};

/// A concrete molecule. Null fields mean the molecule has no such value, so
/// only wildcard criteria can match them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoleculeQuery {
    pub name: NameId,
    pub group: NameId,
    pub state: NameId,
}

/// A concrete residue inside a concrete molecule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueQuery {
    pub molecule: MoleculeQuery,
    pub name: NameId,
    pub number: Option<NonZeroI32>,
    /// Every alias this residue is known by.
    pub aliases: BTreeSet<NameId>,
    /// Names of the atoms of this residue that take part in inter-residue
    /// bonds, as computed by the caller.
    pub bonded: BTreeSet<NameId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomQuery {
    pub residue: ResidueQuery,
    pub name: NameId,
    pub number: Option<NonZeroU32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomTypeQuery {
    pub residue: ResidueQuery,
    pub type_name: NameId,
    pub protons: Option<NonZeroU8>,
}

/// A fully resolved entity to search relationships for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityQuery {
    Molecule(MoleculeQuery),
    Residue(ResidueQuery),
    Atom(AtomQuery),
    AtomType(AtomTypeQuery),
}

impl EntityQuery {
    pub fn molecule(&self) -> &MoleculeQuery {
        match self {
            EntityQuery::Molecule(molecule) => molecule,
            EntityQuery::Residue(residue) => &residue.molecule,
            EntityQuery::Atom(atom) => &atom.residue.molecule,
            EntityQuery::AtomType(atom_type) => &atom_type.residue.molecule,
        }
    }

    /// The residue part of the query, if the query is at residue level or
    /// finer.
    pub fn residue(&self) -> Option<&ResidueQuery> {
        match self {
            EntityQuery::Molecule(_) => None,
            EntityQuery::Residue(residue) => Some(residue),
            EntityQuery::Atom(atom) => Some(&atom.residue),
            EntityQuery::AtomType(atom_type) => Some(&atom_type.residue),
        }
    }
}

impl From<MoleculeQuery> for EntityQuery {
    fn from(query: MoleculeQuery) -> Self {
        EntityQuery::Molecule(query)
    }
}

impl From<ResidueQuery> for EntityQuery {
    fn from(query: ResidueQuery) -> Self {
        EntityQuery::Residue(query)
    }
}

impl From<AtomQuery> for EntityQuery {
    fn from(query: AtomQuery) -> Self {
        EntityQuery::Atom(query)
    }
}

impl From<AtomTypeQuery> for EntityQuery {
    fn from(query: AtomTypeQuery) -> Self {
        EntityQuery::AtomType(query)
    }
}
