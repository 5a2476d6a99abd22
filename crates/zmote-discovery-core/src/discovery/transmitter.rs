//! Periodic discovery query sender.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::protocol::encode_beacon;
use crate::types::Zmote;

/// Create an ephemeral-port UDP socket for sending to the multicast group.
pub fn create_send_socket(multicast_ttl: u32) -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_multicast_ttl_v4(multicast_ttl)?;
    socket.set_multicast_loop_v4(true)?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Sends the discovery query every beacon interval until cancelled.
pub struct Transmitter {
    socket: UdpSocket,
    target: SocketAddr,
    payload: Vec<u8>,
    interval: Duration,
}

impl Transmitter {
    /// Bind the outbound socket. Must be called inside a tokio runtime.
    pub fn bind(config: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let std_socket = create_send_socket(config.multicast_ttl)
            .map_err(|e| DiscoveryError::socket("create query socket", e))?;
        let socket = UdpSocket::from_std(std_socket)
            .map_err(|e| DiscoveryError::socket("register query socket", e))?;

        Ok(Self {
            socket,
            target: SocketAddr::V4(config.query_addr()),
            payload: config.query_payload.as_bytes().to_vec(),
            interval: config.beacon_interval(),
        })
    }

    /// Run the send loop, returning the number of queries sent.
    ///
    /// The first query goes out immediately. A failed send is logged and
    /// left for the next tick.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let mut sent = 0u64;

        while !cancel.is_cancelled() {
            match self.socket.send_to(&self.payload, self.target).await {
                Ok(_) => {
                    sent += 1;
                    debug!(dest = %self.target, sent, "discovery query sent");
                }
                Err(e) => {
                    warn!(dest = %self.target, error = %e, "discovery query send failed");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        debug!(sent, "transmitter stopped");
        sent
    }
}

/// Send `count` synthetic beacon responses for `zmote` to the response port.
///
/// Acts as a stand-in device, so a running receiver can be exercised
/// without hardware.
pub async fn announce(
    config: &DiscoveryConfig,
    zmote: &Zmote,
    count: u32,
    spacing: Duration,
) -> Result<(), DiscoveryError> {
    let std_socket = create_send_socket(config.multicast_ttl)
        .map_err(|e| DiscoveryError::socket("create announce socket", e))?;
    let socket = UdpSocket::from_std(std_socket)
        .map_err(|e| DiscoveryError::socket("register announce socket", e))?;

    let dest = SocketAddr::from((config.group, config.response_port));
    let beacon = encode_beacon(zmote);

    for i in 0..count {
        if i > 0 {
            sleep(spacing).await;
        }
        socket.send_to(beacon.as_bytes(), dest).await?;
        debug!(%dest, uuid = %zmote.uuid, "beacon response announced");
    }

    Ok(())
}
