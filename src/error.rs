//! Error types for loading vendor tables and configuration.
//!
//! Detection itself never fails; only the file and grammar adapters around it
//! produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// Crate error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A vendor table or rule did not match the JSON grammar.
    #[error("failed to parse {source_name}: {error}")]
    Parse {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },

    /// A vendor table or config file could not be read.
    #[error("failed to read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// A TOML config file did not parse.
    #[error("config parse error in {}: {error}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        error: toml::de::Error,
    },

    /// A result could not be written as JSON.
    #[error("failed to serialize output: {0}")]
    Output(#[source] serde_json::Error),

    /// The logger could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logger(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;
