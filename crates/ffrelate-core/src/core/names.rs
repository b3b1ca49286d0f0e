use super::ids::NameId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The namespaces a name can be interned under.
///
/// Every namespace carries its own case-folding policy, so the same raw text
/// may normalize differently depending on where it is used (for example a
/// case-sensitive residue alias versus a case-insensitive residue name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameKind {
    MoleculeName,
    MoleculeGroup,
    MoleculeState,
    ResidueName,
    ResidueAlias,
    AtomName,
    AtomType,
    UserId,
}

impl NameKind {
    pub const ALL: [NameKind; 8] = [
        NameKind::MoleculeName,
        NameKind::MoleculeGroup,
        NameKind::MoleculeState,
        NameKind::ResidueName,
        NameKind::ResidueAlias,
        NameKind::AtomName,
        NameKind::AtomType,
        NameKind::UserId,
    ];
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NameKind::MoleculeName => "molecule name",
            NameKind::MoleculeGroup => "molecule group",
            NameKind::MoleculeState => "molecule state",
            NameKind::ResidueName => "residue name",
            NameKind::ResidueAlias => "residue alias",
            NameKind::AtomName => "atom name",
            NameKind::AtomType => "atom type",
            NameKind::UserId => "user id",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseFolding {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseFolding {
    /// Normalizes `raw` under this policy. Surrounding whitespace is never
    /// significant.
    pub fn apply(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            CaseFolding::Sensitive => trimmed.to_string(),
            CaseFolding::Insensitive => trimmed.to_uppercase(),
        }
    }
}

/// Bidirectional mapping between normalized strings and [`NameId`]s.
///
/// Ids are allocated sequentially from 1 and are never reused. The empty
/// string is the wildcard and always maps to [`NameId::NULL`].
#[derive(Debug, Clone, Default)]
pub struct NameInterner {
    ids: HashMap<String, NameId>,
    names: Vec<String>,
}

impl NameInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an interner from names listed in id order.
    pub fn from_names(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), NameId::new(index as u32 + 1)))
            .collect();
        Self { ids, names }
    }

    pub fn intern(&mut self, name: &str) -> NameId {
        if name.is_empty() {
            return NameId::NULL;
        }
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        self.names.push(name.to_string());
        let id = NameId::new(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Looks up a name without allocating. Unknown names yield `None`; the
    /// empty string yields the wildcard.
    pub fn get(&self, name: &str) -> Option<NameId> {
        if name.is_empty() {
            return Some(NameId::NULL);
        }
        self.ids.get(name).copied()
    }

    /// Reverse lookup. The wildcard has no string.
    pub fn resolve(&self, id: NameId) -> Option<&str> {
        if id.is_null() {
            return None;
        }
        self.names.get(id.get() as usize - 1).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
