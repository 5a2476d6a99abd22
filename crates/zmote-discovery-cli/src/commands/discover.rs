//! Discover command implementation.

use std::time::Duration;

use zmote_discovery_core::{DiscoveryConfig, DiscoveryService};

use crate::cli::DiscoverArgs;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the discover command
pub async fn run_discover(
    args: DiscoverArgs,
    config: DiscoveryConfig,
    json: bool,
) -> Result<(), CliError> {
    if args.duration == 0 {
        return Err(CliError::InvalidArgument("duration must be at least 1 second".to_string()));
    }

    let formatter = get_formatter(json);
    let duration = Duration::from_secs(args.duration);

    eprintln!("Discovering zmotes for {} seconds...", duration.as_secs());

    let report = DiscoveryService::discover_once(config, duration).await?;
    println!("{}", formatter.format_zmotes(&report.zmotes, &report.stats));

    if report.zmotes.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}
