//! # Workflows Module
//!
//! The public entry point of the library. [`database::ParameterDatabase`]
//! owns every table of a parameter database behind a single lock and exposes
//! registration, search, binding and resolution, both with interned ids and
//! with plain strings ([`spec::MatchSpec`], [`spec::EntitySpec`]).
//!
//! ```ignore
//! use ffrelate::workflows::database::ParameterDatabase;
//! use ffrelate::workflows::spec::{EntitySpec, MatchSpec};
//!
//! let db = ParameterDatabase::new(DatabaseConfig::builder().table("charge").build()?);
//! let rule = db.register_spec(&MatchSpec { atom: Some("CA".into()), ..Default::default() })?;
//! db.bind("charge", rule, ParamId::new(1))?;
//!
//! let query = db.query(&EntitySpec { atom: Some("CA".into()), ..Default::default() })?;
//! let param = db.resolve_entity("charge", &query)?;
//! ```

pub mod database;
pub mod spec;
