//! # Engine Module
//!
//! The stateful tables of a parameter database and the algorithms that run
//! over them.
//!
//! - [`relations`] - the deduplicating relationship store and its search
//! - [`candidates`] - the score-ordered candidate map a search produces
//! - [`bindings`] - relationship and user-id bindings plus the resolver
//! - [`library`] - storage for the parameter values that `ParamId`s refer to
//! - [`state`] - all tables of one database, unsynchronized
//! - [`snapshot`] - TOML persistence of a whole database
//! - [`config`] - per-namespace case folding and declared tables
//! - [`error`] - the error type shared by this layer

pub mod bindings;
pub mod candidates;
pub mod config;
pub mod error;
pub mod library;
pub mod relations;
pub mod snapshot;
pub mod state;
