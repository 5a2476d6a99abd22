//! JSON-formatted output for CLI.

use serde::Serialize;
use serde_json::json;
use zmote_discovery_core::discovery::StatsSnapshot;
use zmote_discovery_core::{ParseError, SeenZmote, Zmote};

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_zmotes(&self, zmotes: &[SeenZmote], stats: &StatsSnapshot) -> String {
        let output = json!({
            "zmotes": zmotes,
            "count": zmotes.len(),
            "stats": stats
        });
        Self::to_json(&output)
    }

    fn format_zmote(&self, zmote: &Zmote) -> String {
        Self::to_json(&json!({
            "valid": true,
            "zmote": zmote
        }))
    }

    fn format_not_a_beacon(&self) -> String {
        Self::to_json(&json!({
            "valid": false,
            "reason": "no AMXB<- marker"
        }))
    }

    fn format_parse_error(&self, error: &ParseError) -> String {
        Self::to_json(&json!({
            "valid": false,
            "reason": error.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_format_zmotes_empty() {
        let output = JsonOutput::new().format_zmotes(&[], &StatsSnapshot::default());
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["stats"]["malformed"], 0);
    }

    #[test]
    fn test_format_parse_error() {
        let output = JsonOutput::new().format_parse_error(&ParseError::MissingField("uuid"));
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["reason"], "required field 'uuid' is missing");
    }
}
