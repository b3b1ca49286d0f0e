//! Specificity scores for match criteria.
//!
//! A [`Score`] is a lexicographic triple (molecule, residue, atom) packed into
//! a single `u64`. Each tier occupies [`TIER_BITS`] bits and is saturated at
//! [`TIER_MAX`], so detail at a coarser tier always outranks any amount of
//! detail at a finer tier. Within a tier, field weights are powers of two in
//! priority order and the unbounded set-cardinality bonuses are capped well
//! below the smallest field weight.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

pub const TIER_BITS: u32 = 20;
pub const TIER_MAX: u32 = (1 << TIER_BITS) - 1;

pub const W_MOL_NAME: u32 = 1 << 18;
pub const W_MOL_GROUP: u32 = 1 << 17;
pub const W_MOL_STATE: u32 = 1 << 16;

pub const W_RES_NUMBER: u32 = 1 << 18;
pub const W_RES_NAME: u32 = 1 << 17;
/// Alias matches rank below exact residue-name matches.
pub const W_RES_ALIAS: u32 = 1 << 16;
/// Cap for each bond-set cardinality bonus.
pub const MAX_BOND_BONUS: u32 = 255;

pub const W_ATOM_NUMBER: u32 = 1 << 18;
pub const W_ATOM_NAME: u32 = 1 << 17;

pub const W_TYPE_NAME: u32 = 1 << 18;
pub const W_ELEMENT: u32 = 1 << 17;

/// The hierarchy tier a local score contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Molecule,
    Residue,
    Atom,
}

impl Tier {
    fn shift(self) -> u32 {
        match self {
            Tier::Molecule => 2 * TIER_BITS,
            Tier::Residue => TIER_BITS,
            Tier::Atom => 0,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(u64);

impl Score {
    pub const ZERO: Score = Score(0);

    /// Builds the score contributed by a single tier.
    pub fn at_tier(tier: Tier, local: u32) -> Self {
        Score(u64::from(local.min(TIER_MAX)) << tier.shift())
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn tier(self, tier: Tier) -> u32 {
        ((self.0 >> tier.shift()) & u64::from(TIER_MAX)) as u32
    }
}

impl From<u64> for Score {
    fn from(raw: u64) -> Self {
        Score(raw)
    }
}

/// Combines an embedded parent score with a local contribution. Each tier
/// saturates independently so a full tier never carries into the next.
impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        let combine = |tier: Tier| {
            let sum = self.tier(tier).saturating_add(rhs.tier(tier));
            Score::at_tier(tier, sum).0
        };
        Score(combine(Tier::Molecule) | combine(Tier::Residue) | combine(Tier::Atom))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.tier(Tier::Molecule),
            self.tier(Tier::Residue),
            self.tier(Tier::Atom)
        )
    }
}

/// Weight of a single optional field.
pub(crate) fn flag(is_set: bool, weight: u32) -> u32 {
    if is_set { weight } else { 0 }
}

/// Capped cardinality bonus for a bond-constraint set.
pub(crate) fn bond_bonus(len: usize) -> u32 {
    (len as u32).min(MAX_BOND_BONUS)
}
