//! # Core Module
//!
//! Stateless value types shared by the whole library: interned identifiers,
//! name normalization, match criteria at every hierarchy level, concrete
//! entity queries and the specificity scoring scheme.
//!
//! ## Architecture
//!
//! - **Identifiers** ([`ids`]) - `NameId`, `RelateId` and `ParamId` handles with a reserved null
//! - **Names** ([`names`]) - per-namespace case folding and the string interner
//! - **Criteria** ([`criteria`]) - molecule, residue, atom and atom-type match predicates
//! - **Queries** ([`query`]) - fully resolved entities that criteria are matched against
//! - **Scoring** ([`scoring`]) - tiered specificity scores that total-order criteria of any level
//! - **Elements** ([`elements`]) - element symbol to proton count lookup
//!
//! Nothing in this module owns mutable shared state; the tables that do live
//! in [`crate::engine`].

pub mod criteria;
pub mod elements;
pub mod ids;
pub mod names;
pub mod query;
pub mod scoring;
