//! Announce command implementation.

use std::time::Duration;

use zmote_discovery_core::discovery::announce;
use zmote_discovery_core::protocol::derive_ip;
use zmote_discovery_core::{DiscoveryConfig, Zmote};

use crate::cli::AnnounceArgs;
use crate::error::CliError;

/// Send synthetic beacon responses to the response port
pub async fn run_announce(args: AnnounceArgs, config: DiscoveryConfig) -> Result<(), CliError> {
    if args.count == 0 {
        return Err(CliError::InvalidArgument("count must be at least 1".to_string()));
    }

    let zmote = Zmote {
        ip: derive_ip(&args.config_url),
        uuid: args.uuid,
        kind: args.kind,
        make: args.make,
        model: args.model,
        revision: args.revision,
        config_url: args.config_url,
    };

    announce(
        &config,
        &zmote,
        args.count,
        Duration::from_millis(args.spacing),
    )
    .await?;

    println!(
        "Announced {} to {}:{} ({} time(s))",
        zmote.uuid, config.group, config.response_port, args.count
    );

    Ok(())
}
