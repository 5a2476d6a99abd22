//! Discovery configuration.
//!
//! Every field has a protocol default; a JSON file only needs the values it
//! overrides.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;
use crate::protocol::{MULTICAST_GROUP, QUERY_PAYLOAD, QUERY_PORT, RESPONSE_PORT};

const DEFAULT_BEACON_INTERVAL_MS: u64 = 5_000;
const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 1_000;
const DEFAULT_STARTUP_DELAY_MS: u64 = 100;
const DEFAULT_MULTICAST_TTL: u32 = 1;

/// Tunables for the transmitter, receiver and service lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveryConfig {
    /// Multicast group for queries and responses
    pub group: Ipv4Addr,
    /// Destination port of discovery queries
    pub query_port: u16,
    /// Port the receiver binds to for responses
    pub response_port: u16,
    /// Literal query payload
    pub query_payload: String,
    pub beacon_interval_ms: u64,
    /// Upper bound on a single blocking receive
    pub receive_timeout_ms: u64,
    /// Delay between launching the transmitter and the receiver
    pub startup_delay_ms: u64,
    pub multicast_ttl: u32,
    /// Evict records not refreshed within this many seconds.
    ///
    /// `None` keeps every record until the process exits.
    pub record_ttl_secs: Option<u64>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            group: MULTICAST_GROUP,
            query_port: QUERY_PORT,
            response_port: RESPONSE_PORT,
            query_payload: String::from_utf8_lossy(QUERY_PAYLOAD).into_owned(),
            beacon_interval_ms: DEFAULT_BEACON_INTERVAL_MS,
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
            multicast_ttl: DEFAULT_MULTICAST_TTL,
            record_ttl_secs: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn beacon_interval(&self) -> Duration {
        Duration::from_millis(self.beacon_interval_ms)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn record_ttl(&self) -> Option<Duration> {
        self.record_ttl_secs.map(Duration::from_secs)
    }

    /// Where discovery queries are sent.
    pub fn query_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.group, self.query_port)
    }

    /// Check values that would make the service misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.group.is_multicast() {
            return Err(ConfigError::Invalid(format!(
                "group {} is not an IPv4 multicast address",
                self.group
            )));
        }

        if self.query_payload.is_empty() {
            return Err(ConfigError::Invalid("query payload cannot be empty".to_string()));
        }

        if self.beacon_interval_ms == 0 {
            return Err(ConfigError::Invalid("beacon interval must be non-zero".to_string()));
        }

        if self.receive_timeout_ms == 0 {
            return Err(ConfigError::Invalid("receive timeout must be non-zero".to_string()));
        }

        if self.record_ttl_secs == Some(0) {
            return Err(ConfigError::Invalid("record TTL must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: DiscoveryConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly requested file must exist.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path).await,
            _ => Ok(Self::default()),
        }
    }
}

/// Default config file location.
///
/// Uses the `directories` crate to find the platform-specific config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "zmote", "zmote-discovery")
        .map(|dirs| dirs.config_dir().join("config.json"))
}
