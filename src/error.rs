//! Error types.
//!
//! Analysis itself never fails. These cover the edges around it: reading
//! configuration and parsing user-supplied options.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Unknown distance mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown distance mode '{0}' (expected 'pairwise' or 'successive')")]
pub struct ParseModeError(pub String);
