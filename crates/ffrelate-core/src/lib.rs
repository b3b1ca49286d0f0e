//! # ffrelate Core Library
//!
//! A hierarchical relationship-matching and parameter-resolution engine for
//! molecular forcefield parameter databases.
//!
//! Given a concrete molecule, residue or atom, the library finds every
//! registered relationship (a combination of match criteria) compatible with
//! it, ranks them by specificity, and resolves the most specific one that has
//! a parameter bound.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless value types: interned ids, name
//!   normalization, match criteria, concrete queries and the tiered scoring
//!   scheme.
//!
//! - **[`engine`]: The Logic Core.** The stateful tables: the deduplicating
//!   relationship store and its search, the candidate map, parameter
//!   bindings with the resolver, and snapshot persistence.
//!
//! - **[`workflows`]: The Public API.** `ParameterDatabase`, the thread-safe
//!   facade that ties the tables together and accepts plain strings.

pub mod core;
pub mod engine;
pub mod workflows;
