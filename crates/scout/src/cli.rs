use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(propagate_version = true)]
pub struct Cli {
    /// log level
    #[arg(long)]
    pub log: Option<Level>,

    /// config path, defaults to ~/.scout/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file if none exists
    Init,
    /// Run the admin server
    Daemon(DaemonCmdOpts),
    /// Purge the Scout cache once and print the outcome
    Purge,
    /// Print and clear pending notices
    Notices,
}

/// Override config
#[derive(Args, Default)]
pub struct DaemonCmdOpts {
    /// server address
    #[arg(long)]
    pub addr: Option<String>,
    /// server port
    #[arg(long)]
    pub port: Option<u16>,
    /// Scout api base url
    #[arg(long)]
    pub base_url: Option<String>,
    /// purge request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// notice store path
    #[arg(long)]
    pub store_path: Option<PathBuf>,
}
