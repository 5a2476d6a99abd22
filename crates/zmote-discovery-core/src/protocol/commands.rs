//! Outbound beacon payloads.

use super::{FIELD_DELIMITER, RESPONSE_MARKER};
use crate::types::Zmote;

/// Discovery query sent to the multicast group on every tick
pub const QUERY_PAYLOAD: &[u8] = b"SENDAMXB";

/// Render a record in the response wire format.
///
/// Produces `AMXB<-UUID=..><-Type=..><-Make=..><-Model=..><-Revision=..><-Config-URL=..>`,
/// the same shape devices reply with. `ip` is derived on receipt and is not
/// transmitted.
pub fn encode_beacon(zmote: &Zmote) -> String {
    let fields = [
        ("UUID", zmote.uuid.as_str()),
        ("Type", zmote.kind.as_str()),
        ("Make", zmote.make.as_str()),
        ("Model", zmote.model.as_str()),
        ("Revision", zmote.revision.as_str()),
        ("Config-URL", zmote.config_url.as_str()),
    ];

    let body = fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER);

    format!("{}{}>", RESPONSE_MARKER, body)
}
