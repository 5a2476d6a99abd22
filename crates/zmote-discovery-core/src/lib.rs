//! Discovery of zmote devices via AMXB multicast beacons.
//!
//! ```no_run
//! use zmote_discovery_core::{DiscoveryConfig, DiscoveryService};
//!
//! # async fn demo() -> zmote_discovery_core::error::Result<()> {
//! let mut service = DiscoveryService::new(DiscoveryConfig::default());
//! service.start().await?;
//! tokio::time::sleep(std::time::Duration::from_secs(6)).await;
//! for (uuid, zmote) in service.zmotes() {
//!     println!("{} at {}", uuid, zmote.ip);
//! }
//! service.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod types;

pub use config::DiscoveryConfig;
pub use discovery::{DiscoveryReport, DiscoveryService, Registry};
pub use error::{ConfigError, DiscoveryError, ParseError};
pub use types::{SeenZmote, Zmote};
