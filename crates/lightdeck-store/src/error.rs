//! Error types for the configuration store.

use std::path::PathBuf;

use lightdeck_core::ValidationError;
use thiserror::Error;

/// A result type using `ConfigError`.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("cannot access config file '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("cannot parse config file '{path}': {source}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but violates a configuration invariant.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// The aggregate could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}
