//! Discovery service lifecycle.
//!
//! Owns the registry, the cancellation token and the two worker tasks.
//! `start` binds both sockets up front so setup failures reach the caller,
//! then launches the transmitter and, after the startup delay, the receiver.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::receiver::{handle_datagram, DatagramOutcome, Receiver, ReceiverStats, StatsSnapshot};
use super::registry::Registry;
use super::transmitter::Transmitter;
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::types::{SeenZmote, Zmote};

struct Workers {
    cancel: CancellationToken,
    transmitter: JoinHandle<u64>,
    receiver: JoinHandle<()>,
    response_addr: SocketAddr,
}

/// Result of a one-shot [`DiscoveryService::discover_once`] run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub zmotes: Vec<SeenZmote>,
    pub stats: StatsSnapshot,
}

/// AMXB beacon discovery service.
pub struct DiscoveryService {
    config: DiscoveryConfig,
    registry: Registry,
    stats: Arc<ReceiverStats>,
    workers: Option<Workers>,
}

impl DiscoveryService {
    /// Create an idle service with an empty registry.
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            stats: Arc::new(ReceiverStats::default()),
            workers: None,
        }
    }

    /// Start advertising and listening.
    ///
    /// Fails with [`DiscoveryError::AlreadyRunning`] if called twice without
    /// an intervening [`stop`](Self::stop), and with
    /// [`DiscoveryError::Socket`] if either socket cannot be set up.
    pub async fn start(&mut self) -> Result<()> {
        if self.workers.is_some() {
            return Err(DiscoveryError::AlreadyRunning);
        }

        self.config.validate()?;

        let transmitter = Transmitter::bind(&self.config)?;
        let receiver = Receiver::bind(&self.config, self.registry.clone(), self.stats.clone())?;
        let response_addr = receiver.local_addr()?;

        let cancel = CancellationToken::new();
        // Cancels the transmitter if this future is dropped during the delay
        let guard = cancel.clone().drop_guard();

        let transmitter = tokio::spawn(transmitter.run(cancel.clone()));

        // Give the first query a head start before the receiver loop runs
        sleep(self.config.startup_delay()).await;

        let receiver = tokio::spawn(receiver.run(cancel));

        info!(
            group = %self.config.group,
            query_port = self.config.query_port,
            response = %response_addr,
            "zmote discovery started"
        );

        self.workers = Some(Workers {
            cancel: guard.disarm(),
            transmitter,
            receiver,
            response_addr,
        });

        Ok(())
    }

    /// Stop advertising and listening, waiting for both workers to exit.
    ///
    /// Returns immediately when the service is not running. The registry is
    /// kept, so `zmotes` still reports what was seen.
    pub async fn stop(&mut self) {
        let Some(workers) = self.workers.take() else {
            return;
        };

        workers.cancel.cancel();

        if let Err(e) = workers.receiver.await {
            error!(error = %e, "receiver task failed");
        }

        match workers.transmitter.await {
            Ok(sent) => info!(queries_sent = sent, "zmote discovery stopped"),
            Err(e) => error!(error = %e, "transmitter task failed"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.workers.is_some()
    }

    /// Snapshot of all known zmotes, keyed by uuid.
    pub fn zmotes(&self) -> HashMap<String, Zmote> {
        self.registry.snapshot()
    }

    /// Known zmotes with first/last seen timestamps, sorted by uuid.
    pub fn seen_zmotes(&self) -> Vec<SeenZmote> {
        self.registry.entries()
    }

    /// Shared handle to the underlying registry.
    pub fn registry(&self) -> Registry {
        self.registry.clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Address the receiver is bound to, while running.
    pub fn response_addr(&self) -> Option<SocketAddr> {
        self.workers.as_ref().map(|w| w.response_addr)
    }

    /// Feed a datagram through the same path the receiver uses.
    pub fn inject(&self, data: &[u8], source: SocketAddr) -> DatagramOutcome {
        handle_datagram(&self.registry, &self.stats, data, source)
    }

    /// Run discovery for `duration` and return what replied.
    pub async fn discover_once(
        config: DiscoveryConfig,
        duration: Duration,
    ) -> Result<DiscoveryReport> {
        let mut service = Self::new(config);
        service.start().await?;
        sleep(duration).await;
        service.stop().await;

        Ok(DiscoveryReport {
            zmotes: service.seen_zmotes(),
            stats: service.stats(),
        })
    }
}

impl Default for DiscoveryService {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}

impl Drop for DiscoveryService {
    fn drop(&mut self) {
        // Workers exit on their own once they observe the token
        if let Some(workers) = &self.workers {
            workers.cancel.cancel();
        }
    }
}
