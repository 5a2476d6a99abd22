//! AMXB beacon protocol.
//!
//! Discovery is a two-message exchange over IPv4 multicast: a fixed query
//! sent to [`QUERY_PORT`] and free-form text responses received on
//! [`RESPONSE_PORT`]. This module holds the wire constants, the response
//! parser, and the encoder used by the device simulator.

use std::net::Ipv4Addr;

pub mod commands;
pub mod response;

pub use commands::{encode_beacon, QUERY_PAYLOAD};
pub use response::{derive_ip, normalize_key, parse_beacon};

/// Multicast group shared by queries and responses
pub const MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 250, 250);

/// Port devices listen on for discovery queries
pub const QUERY_PORT: u16 = 9130;

/// Port discovery responses are sent to
pub const RESPONSE_PORT: u16 = 9131;

/// Marker preceding the field list of a response
pub const RESPONSE_MARKER: &str = "AMXB<-";

/// Separator between consecutive `key=value` fields
pub const FIELD_DELIMITER: &str = "><-";

/// Receive buffer size for a single response datagram
pub const MAX_DATAGRAM_SIZE: usize = 1024;
