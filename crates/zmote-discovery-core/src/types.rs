//! Shared types for zmote discovery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A device discovered via an AMXB beacon response.
///
/// Values are immutable once parsed; a newer beacon for the same `uuid`
/// produces a whole new record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zmote {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub make: String,
    pub model: String,
    pub revision: String,
    pub config_url: String,
    /// Host portion of `config_url` with the scheme stripped.
    pub ip: String,
}

/// A registry entry as reported to callers, with observation timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenZmote {
    #[serde(flatten)]
    pub zmote: Zmote,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Zmote {
        Zmote {
            uuid: "abc123".to_string(),
            kind: "IR".to_string(),
            make: "Acme".to_string(),
            model: "X1".to_string(),
            revision: "2".to_string(),
            config_url: "http://10.0.0.5:80".to_string(),
            ip: "10.0.0.5:80".to_string(),
        }
    }

    #[test]
    fn test_zmote_serializes_kind_as_type() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "IR");
        assert!(json.get("kind").is_none());
        assert_eq!(json["config_url"], "http://10.0.0.5:80");
    }

    #[test]
    fn test_seen_zmote_flattens_record() {
        let now = Utc::now();
        let seen = SeenZmote {
            zmote: sample(),
            first_seen: now,
            last_seen: now,
        };
        let json = serde_json::to_value(&seen).unwrap();
        assert_eq!(json["uuid"], "abc123");
        assert!(json.get("lastSeen").is_some());
    }
}
