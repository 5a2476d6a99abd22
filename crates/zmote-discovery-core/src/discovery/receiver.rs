//! Multicast listener for beacon responses.
//!
//! Joins the discovery group with address reuse enabled so other local
//! listeners on the same port keep working. Receives are bounded by the
//! configured timeout so the loop notices cancellation without a wake-up
//! datagram.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::registry::Registry;
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, ParseError};
use crate::protocol::{parse_beacon, MAX_DATAGRAM_SIZE};

/// Pause after a failed receive before trying again.
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Create a reusable UDP socket joined to `group` and bound to `port`.
pub fn create_multicast_socket(
    group: Ipv4Addr,
    port: u16,
) -> Result<std::net::UdpSocket, DiscoveryError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| DiscoveryError::socket("create response socket", e))?;

    socket
        .set_reuse_address(true)
        .map_err(|e| DiscoveryError::socket("set SO_REUSEADDR", e))?;

    #[cfg(unix)]
    socket
        .set_reuse_port(true)
        .map_err(|e| DiscoveryError::socket("set SO_REUSEPORT", e))?;

    // Windows refuses to bind to a multicast address
    #[cfg(unix)]
    let bind_ip = group;
    #[cfg(not(unix))]
    let bind_ip = Ipv4Addr::UNSPECIFIED;

    let addr = SocketAddr::from((bind_ip, port));
    socket
        .bind(&addr.into())
        .map_err(|e| DiscoveryError::socket(format!("bind {}", addr), e))?;

    socket
        .join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
        .map_err(|e| DiscoveryError::socket(format!("join multicast group {}", group), e))?;

    socket
        .set_nonblocking(true)
        .map_err(|e| DiscoveryError::socket("set non-blocking", e))?;

    Ok(socket.into())
}

/// What became of one received datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatagramOutcome {
    /// Not a discovery response
    Ignored,
    /// First beacon from this uuid
    Discovered(String),
    /// Refreshed an already known uuid
    Updated(String),
    /// Carried the marker but could not be parsed; dropped
    Malformed(ParseError),
}

/// Datagram counters, shared between the receiver task and its owner.
#[derive(Debug, Default)]
pub struct ReceiverStats {
    accepted: AtomicU64,
    ignored: AtomicU64,
    malformed: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub ignored: u64,
    pub malformed: u64,
}

impl ReceiverStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }

    fn record(&self, outcome: &DatagramOutcome) {
        let counter = match outcome {
            DatagramOutcome::Ignored => &self.ignored,
            DatagramOutcome::Discovered(_) | DatagramOutcome::Updated(_) => &self.accepted,
            DatagramOutcome::Malformed(_) => &self.malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Parse one datagram and fold it into the registry.
///
/// Malformed discovery messages are logged and skipped; they never stop
/// the receive loop.
pub fn handle_datagram(
    registry: &Registry,
    stats: &ReceiverStats,
    data: &[u8],
    source: SocketAddr,
) -> DatagramOutcome {
    let outcome = match parse_beacon(data) {
        Ok(None) => DatagramOutcome::Ignored,
        Ok(Some(zmote)) => {
            let uuid = zmote.uuid.clone();
            debug!(%source, %uuid, ip = %zmote.ip, "beacon response");
            if registry.upsert(zmote) {
                info!(%source, %uuid, "zmote discovered");
                DatagramOutcome::Discovered(uuid)
            } else {
                DatagramOutcome::Updated(uuid)
            }
        }
        Err(e) => {
            warn!(%source, error = %e, "dropping malformed beacon response");
            DatagramOutcome::Malformed(e)
        }
    };

    stats.record(&outcome);
    outcome
}

/// Listens for beacon responses and upserts them into the registry.
pub struct Receiver {
    socket: UdpSocket,
    registry: Registry,
    stats: Arc<ReceiverStats>,
    receive_timeout: Duration,
    record_ttl: Option<Duration>,
}

impl Receiver {
    /// Bind and join the response socket. Must be called inside a tokio runtime.
    pub fn bind(
        config: &DiscoveryConfig,
        registry: Registry,
        stats: Arc<ReceiverStats>,
    ) -> Result<Self, DiscoveryError> {
        let std_socket = create_multicast_socket(config.group, config.response_port)?;
        let socket = UdpSocket::from_std(std_socket)
            .map_err(|e| DiscoveryError::socket("register response socket", e))?;

        Ok(Self {
            socket,
            registry,
            stats,
            receive_timeout: config.receive_timeout(),
            record_ttl: config.record_ttl(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Run the receive loop until cancelled.
    ///
    /// Cancellation is checked after every bounded receive, so shutdown
    /// takes at most one receive timeout.
    pub async fn run(self, cancel: CancellationToken) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        while !cancel.is_cancelled() {
            match timeout(self.receive_timeout, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((len, source))) => {
                    handle_datagram(&self.registry, &self.stats, &buf[..len], source);
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "beacon receive failed");
                    backoff(&cancel, RECEIVE_ERROR_BACKOFF).await;
                }
                Err(_) => {
                    // Timeout - nothing arrived, re-check cancellation
                }
            }

            if let Some(ttl) = self.record_ttl {
                let removed = self.registry.prune_older_than(ttl);
                if removed > 0 {
                    info!(removed, "pruned stale zmotes");
                }
            }
        }

        debug!("receiver stopped");
    }
}

/// Sleep for `delay`, returning early if `cancel` fires.
async fn backoff(cancel: &CancellationToken, delay: Duration) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = sleep(delay) => {}
    }
}
