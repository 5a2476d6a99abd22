//! Watch command implementation.

use std::io::{self, Write};
use std::time::Duration;

use colored::*;
use zmote_discovery_core::{DiscoveryConfig, DiscoveryService};

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the watch command until Ctrl+C
pub async fn run_watch(
    args: WatchArgs,
    config: DiscoveryConfig,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let refresh = Duration::from_secs(args.refresh.max(1));

    let mut service = DiscoveryService::new(config);
    service.start().await?;

    eprintln!("Watching for zmotes (press Ctrl+C to stop)...");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(refresh);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = ticker.tick() => {
                let zmotes = service.seen_zmotes();
                let stats = service.stats();

                if !json {
                    // Clear screen and print header
                    print!("\x1B[2J\x1B[1;1H");
                    println!("{}", "zmote Discovery Watch".bold());
                    println!("{}", "Press Ctrl+C to stop".dimmed());
                    println!();
                }

                println!("{}", formatter.format_zmotes(&zmotes, &stats));
                io::stdout().flush().ok();
            }
        }
    }

    service.stop().await;
    Ok(())
}
