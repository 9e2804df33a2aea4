//! Error types for refreshable-core.
//!
//! The gesture and refresh core cannot fail; these cover the ambient
//! surfaces around it (configuration files and colour strings).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving a [`crate::RefreshConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The TOML document did not match the config schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered back to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Error type for colour parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Non-hex characters in the string
    #[error("invalid hex colour: {0}")]
    InvalidHex(String),
    /// Neither 6 nor 8 digits
    #[error("invalid hex colour length {0} (expected 6 or 8)")]
    InvalidLength(usize),
}
