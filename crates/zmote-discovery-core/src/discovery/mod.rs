//! Multicast beacon discovery.
//!
//! A transmitter task broadcasts the discovery query on a fixed cadence, a
//! receiver task folds beacon responses into a shared registry, and the
//! service starts and stops the pair as one unit.

pub mod receiver;
pub mod registry;
pub mod service;
pub mod transmitter;

pub use receiver::{handle_datagram, DatagramOutcome, ReceiverStats, StatsSnapshot};
pub use registry::Registry;
pub use service::{DiscoveryReport, DiscoveryService};
pub use transmitter::announce;
