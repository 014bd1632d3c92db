//! Error types

use thiserror::Error;

/// Structural problems in the declaration inventory.
///
/// `path` locates the offending record, e.g. `declarations[2].members[0]`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("{path}: missing required field '{field}'")]
    MissingField { path: String, field: &'static str },

    #[error("{path}: unknown declaration kind '{kind}'")]
    UnknownKind { path: String, kind: String },

    #[error("{path}: unknown access level '{level}'")]
    UnknownAccessLevel { path: String, level: String },

    #[error("{path}: enum case '{name}' declared outside of an enum")]
    MisplacedCase { path: String, name: String },
}

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("link ending '{0}' must not contain '/'")]
    InvalidLinkEnding(String),
}

/// Errors produced by a generation run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid inventory: {0}")]
    Inventory(#[from] InventoryError),

    #[error("failed to parse inventory JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to format document: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
