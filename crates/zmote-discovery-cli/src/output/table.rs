//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use zmote_discovery_core::discovery::StatsSnapshot;
use zmote_discovery_core::{ParseError, SeenZmote, Zmote};

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_zmotes(&self, zmotes: &[SeenZmote], stats: &StatsSnapshot) -> String {
        if zmotes.is_empty() {
            return "No zmotes found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["UUID", "IP", "Type", "Make", "Model", "Rev", "Last Seen"]);

        for seen in zmotes {
            let z = &seen.zmote;
            table.add_row(vec![
                Cell::new(&z.uuid),
                Cell::new(&z.ip),
                Cell::new(&z.kind),
                Cell::new(&z.make),
                Cell::new(&z.model),
                Cell::new(&z.revision),
                Cell::new(
                    seen.last_seen
                        .with_timezone(&chrono::Local)
                        .format("%H:%M:%S")
                        .to_string(),
                ),
            ]);
        }

        let mut out = format!("{}\n\nFound {} zmote(s)", table, zmotes.len());
        if stats.malformed > 0 {
            out.push_str(&format!(
                "\n{}",
                format!("{} malformed beacon(s) dropped", stats.malformed).yellow()
            ));
        }
        out
    }

    fn format_zmote(&self, zmote: &Zmote) -> String {
        let mut lines = Vec::new();

        lines.push(format!("{} {}", "Zmote:".bold(), zmote.uuid));
        lines.push(format!("  Type:       {}", zmote.kind));
        lines.push(format!("  Make:       {}", zmote.make));
        lines.push(format!("  Model:      {}", zmote.model));
        lines.push(format!("  Revision:   {}", zmote.revision));
        lines.push(format!("  Config URL: {}", zmote.config_url));
        lines.push(format!("  IP:         {}", zmote.ip));

        lines.join("\n")
    }

    fn format_not_a_beacon(&self) -> String {
        format!("{}", "Not a discovery response (no AMXB<- marker)".yellow())
    }

    fn format_parse_error(&self, error: &ParseError) -> String {
        format!("{} {}", "Malformed beacon:".red(), error)
    }
}
