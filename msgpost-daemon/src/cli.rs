//! CLI argument definitions for msgpost-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Msgpost bridge daemon.
///
/// Follows the game server log, tracks player identities across
/// nickname changes, and relays chat and join/leave notifications
/// to a chat webhook.
#[derive(Parser, Debug)]
#[command(name = "msgpost-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "msgpost.json")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
