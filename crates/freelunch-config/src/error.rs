use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Menu or env file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Menu file is not valid TOML or violates the menu schema
    ///
    /// Covers malformed `provider::model` ids, unknown provider tags, and
    /// unknown capability `type` tags, all of which fail deserialization.
    #[error("failed to parse menu file {path}: {source}")]
    Parse {
        /// Path that failed to parse
        path: PathBuf,
        /// Underlying TOML error (includes line/column context)
        #[source]
        source: Box<toml::de::Error>,
    },

    /// Menu parsed but is semantically invalid
    #[error("invalid menu: {message}")]
    Invalid {
        /// What is wrong and where
        message: String,
    },
}
