use thiserror::Error;

use super::config::ConfigError;
use crate::core::criteria::CriteriaLevel;
use crate::core::ids::RelateId;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unknown relationship: {0}")]
    UnknownRelationship(RelateId),

    #[error("A {child} relationship cannot embed {parent_id}, which is a {parent} relationship")]
    InvalidParent {
        child: CriteriaLevel,
        parent: CriteriaLevel,
        parent_id: RelateId,
    },

    #[error("User id '{from}' cannot be bound to another user id '{to}'")]
    NestedIndirection { from: String, to: String },

    #[error("Invalid match specification: {0}")]
    InvalidSpec(String),

    #[error("Unknown parameter table: '{0}'")]
    UnknownTable(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    TomlRead {
        path: String,
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Corrupted snapshot: {0}")]
    CorruptSnapshot(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
