//! Beacon response parsing.
//!
//! Responses are loosely structured text such as
//! `AMXB<-UUID=abc123><-Type=IR><-Make=Acme><-Model=X1><-Revision=2><-Config-URL=http://10.0.0.5>`.
//! Anything before the last marker is ignored, key names are matched
//! case-insensitively with `-` and `_` treated alike, and field order does
//! not matter.

use std::collections::HashMap;

use super::{FIELD_DELIMITER, RESPONSE_MARKER};
use crate::error::ParseError;
use crate::types::Zmote;

/// Normalized names of the fields every response must carry
const REQUIRED_FIELDS: [&str; 6] = ["uuid", "type", "make", "model", "revision", "config_url"];

/// Normalize a field name: lower-case, `-` replaced by `_`.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace('-', "_")
}

/// Derive the device address from its reported configuration URL.
///
/// Strips the scheme (`http://` and the like) and keeps the rest verbatim,
/// so `http://10.0.0.5:80/cfg` becomes `10.0.0.5:80/cfg`. A URL without a
/// scheme is returned unchanged.
pub fn derive_ip(config_url: &str) -> String {
    match config_url.split_once("://") {
        Some((_, rest)) => rest.to_string(),
        None => config_url.to_string(),
    }
}

/// Parse one datagram into a [`Zmote`].
///
/// Returns `Ok(None)` for traffic that is not a discovery response (no
/// `AMXB<-` marker), and an error when the marker is present but the field
/// list is malformed.
pub fn parse_beacon(data: &[u8]) -> Result<Option<Zmote>, ParseError> {
    let text = String::from_utf8_lossy(data);

    if !text.contains(RESPONSE_MARKER) {
        return Ok(None);
    }

    // Some firmware pads datagrams with NULs or a line ending
    let trimmed = text
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .trim_end_matches('>');

    let body = match trimmed.rsplit_once(RESPONSE_MARKER) {
        Some((_, body)) => body,
        None => return Ok(None),
    };

    let mut fields: HashMap<String, String> = HashMap::with_capacity(REQUIRED_FIELDS.len());

    for raw in body.split(FIELD_DELIMITER) {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ParseError::MissingSeparator(raw.to_string()))?;

        let key = normalize_key(key);
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            return Err(ParseError::UnexpectedField(key));
        }

        // Repeated keys: last one wins
        fields.insert(key, value.to_string());
    }

    let mut take = |name: &'static str| fields.remove(name).ok_or(ParseError::MissingField(name));

    let uuid = take("uuid")?;
    let kind = take("type")?;
    let make = take("make")?;
    let model = take("model")?;
    let revision = take("revision")?;
    let config_url = take("config_url")?;
    let ip = derive_ip(&config_url);

    Ok(Some(Zmote {
        uuid,
        kind,
        make,
        model,
        revision,
        config_url,
        ip,
    }))
}
