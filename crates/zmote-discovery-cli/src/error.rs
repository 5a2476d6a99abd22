//! Error types for the zmote-discovery CLI.
//!
//! CliError wraps the core errors and adds CLI-specific variants.

use thiserror::Error;
use zmote_discovery_core::error::{ConfigError, DiscoveryError, ParseError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const NO_DEVICES: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No devices found")]
    NoDevicesFound,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Discovery(e) => match e {
                DiscoveryError::Socket { .. } | DiscoveryError::Io(_) => exit_codes::NETWORK_ERROR,
                DiscoveryError::Config(_) => exit_codes::INVALID_ARGS,
                DiscoveryError::Parse(_) => exit_codes::INVALID_ARGS,
                DiscoveryError::AlreadyRunning => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoDevicesFound => exit_codes::NO_DEVICES,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Discovery(DiscoveryError::Config(e))
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Discovery(DiscoveryError::Parse(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
