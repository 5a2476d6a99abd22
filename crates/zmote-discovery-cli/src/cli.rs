//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// zmote-discovery - find zmote devices on the local network
#[derive(Parser, Debug)]
#[command(name = "zmote-discovery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON config file
    #[arg(long, global = true, env = "ZMOTE_DISCOVERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the beacon interval in milliseconds
    #[arg(long, global = true)]
    pub interval: Option<u64>,

    /// Override the receive timeout in milliseconds
    #[arg(long, global = true)]
    pub receive_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover devices for a fixed duration
    Discover(DiscoverArgs),

    /// Continuously discover devices until Ctrl+C
    Watch(WatchArgs),

    /// Parse a beacon response offline
    Parse(ParseArgs),

    /// Send synthetic beacon responses, acting as a device
    Announce(AnnounceArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Discovery duration in seconds
    #[arg(short, long, default_value = "6")]
    pub duration: u64,
}

// ==================== Watch ====================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between screen refreshes
    #[arg(short, long, default_value = "2")]
    pub refresh: u64,
}

// ==================== Parse ====================

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Beacon text (read from stdin when omitted)
    pub text: Option<String>,
}

// ==================== Announce ====================

#[derive(Args, Debug)]
pub struct AnnounceArgs {
    /// Device uuid
    #[arg(long)]
    pub uuid: String,

    /// Device type
    #[arg(long = "type", default_value = "IR")]
    pub kind: String,

    /// Manufacturer
    #[arg(long, default_value = "zmote")]
    pub make: String,

    /// Model
    #[arg(long, default_value = "ZV-2")]
    pub model: String,

    /// Revision
    #[arg(long, default_value = "1")]
    pub revision: String,

    /// Configuration URL reported by the device
    #[arg(long)]
    pub config_url: String,

    /// Number of responses to send
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,

    /// Milliseconds between responses
    #[arg(long, default_value = "500")]
    pub spacing: u64,
}
