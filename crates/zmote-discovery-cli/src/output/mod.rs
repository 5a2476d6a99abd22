//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use zmote_discovery_core::discovery::StatsSnapshot;
use zmote_discovery_core::{ParseError, SeenZmote, Zmote};

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the discovered device list
    fn format_zmotes(&self, zmotes: &[SeenZmote], stats: &StatsSnapshot) -> String;

    /// Format a single parsed record
    fn format_zmote(&self, zmote: &Zmote) -> String;

    /// Format the result of parsing text that was not a discovery response
    fn format_not_a_beacon(&self) -> String;

    /// Format a malformed beacon error
    fn format_parse_error(&self, error: &ParseError) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
