use serde::Deserialize;

/// Match criteria written with plain strings, as found in parameter files.
///
/// Molecule fields, residue fields and atom fields are registered as a chain
/// of relationships, each embedding the previous one. `atom`/`atom-number`
/// and `atom-type`/`element` are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchSpec {
    pub molecule: Option<String>,
    pub group: Option<String>,
    pub state: Option<String>,
    pub residue: Option<String>,
    pub residue_number: Option<i32>,
    pub residue_alias: Option<String>,
    #[serde(default)]
    pub bonded: Vec<String>,
    #[serde(default)]
    pub not_bonded: Vec<String>,
    pub atom: Option<String>,
    pub atom_number: Option<u32>,
    pub atom_type: Option<String>,
    pub element: Option<String>,
}

impl MatchSpec {
    pub(crate) fn has_molecule_detail(&self) -> bool {
        self.molecule.is_some() || self.group.is_some() || self.state.is_some()
    }

    pub(crate) fn has_residue_detail(&self) -> bool {
        self.residue.is_some()
            || self.residue_number.is_some()
            || self.residue_alias.is_some()
            || !self.bonded.is_empty()
            || !self.not_bonded.is_empty()
    }

    pub(crate) fn has_atom_detail(&self) -> bool {
        self.atom.is_some() || self.atom_number.is_some()
    }

    pub(crate) fn has_atom_type_detail(&self) -> bool {
        self.atom_type.is_some() || self.element.is_some()
    }
}

/// A concrete entity written with plain strings.
///
/// The query level is the finest level with any field set: atom type, then
/// atom, then residue, then molecule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EntitySpec {
    pub molecule: Option<String>,
    pub group: Option<String>,
    pub state: Option<String>,
    pub residue: Option<String>,
    pub residue_number: Option<i32>,
    /// Aliases in addition to those registered for the residue name.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Atoms of the residue involved in inter-residue bonds.
    #[serde(default)]
    pub bonded: Vec<String>,
    pub atom: Option<String>,
    pub atom_number: Option<u32>,
    pub atom_type: Option<String>,
    pub element: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLevel {
    Molecule,
    Residue,
    Atom,
    AtomType,
}

impl EntitySpec {
    pub fn level(&self) -> EntityLevel {
        if self.atom_type.is_some() || self.element.is_some() {
            EntityLevel::AtomType
        } else if self.atom.is_some() || self.atom_number.is_some() {
            EntityLevel::Atom
        } else if self.residue.is_some()
            || self.residue_number.is_some()
            || !self.aliases.is_empty()
            || !self.bonded.is_empty()
        {
            EntityLevel::Residue
        } else {
            EntityLevel::Molecule
        }
    }
}
