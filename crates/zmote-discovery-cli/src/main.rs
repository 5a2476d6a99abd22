//! zmote-discovery CLI - find zmote devices on the local network.
//!
//! Wraps the AMXB beacon discovery service for one-shot scans, live
//! watching, offline beacon parsing and device simulation.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use tracing::debug;
use zmote_discovery_core::DiscoveryConfig;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli).await?;

    match cli.command {
        Commands::Discover(args) => commands::run_discover(args, config, cli.json).await,
        Commands::Watch(args) => commands::run_watch(args, config, cli.json).await,
        Commands::Parse(args) => commands::run_parse(args, cli.json).await,
        Commands::Announce(args) => commands::run_announce(args, config).await,
    }
}

/// Resolve the config file, then apply command-line overrides.
async fn load_config(cli: &Cli) -> Result<DiscoveryConfig, CliError> {
    let mut config = DiscoveryConfig::load_or_default(cli.config.as_deref()).await?;

    if let Some(ms) = cli.interval {
        config.beacon_interval_ms = ms;
    }
    if let Some(ms) = cli.receive_timeout {
        config.receive_timeout_ms = ms;
    }

    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}
