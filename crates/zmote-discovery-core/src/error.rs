//! Error types for zmote discovery.
//!
//! Each concern gets its own enum; `DiscoveryError` is the umbrella type
//! returned by the service surface.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level discovery error
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Socket setup failed ({context}): {source}")]
    Socket {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed beacon: {0}")]
    Parse(#[from] ParseError),

    #[error("Discovery service is already running")]
    AlreadyRunning,
}

impl DiscoveryError {
    pub(crate) fn socket(context: impl Into<String>, source: std::io::Error) -> Self {
        DiscoveryError::Socket {
            context: context.into(),
            source,
        }
    }
}

/// Malformed beacon response errors.
///
/// Only produced for datagrams that carry the AMXB marker; anything else is
/// not a discovery response and is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("field '{0}' has no '=' separator")]
    MissingSeparator(String),

    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("unexpected field '{0}'")]
    UnexpectedField(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;
