//! CLI module for the watchdog
//!
//! # Commands
//!
//! - `run` - Start the failover watchdog loop
//! - `check` - Probe the primary once and report
//! - `failover` - Run the promotion procedure once, by hand
//! - `config` - Configuration utilities (init, show)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start with a config file, overriding the target from the environment
//! PRIMARY_HEALTH_URL=https://git.example.com/api/healthz watchdog run -c watchdog.toml
//!
//! # Is the primary up right now?
//! watchdog check --json
//!
//! # Show what a failover would execute
//! watchdog failover --dry-run
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod failover;
pub mod run;

pub use completions::handle_completions;
pub use config::{handle_config_init, handle_config_show};

use crate::config::{ConfigError, WatchdogConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Failover watchdog
#[derive(Parser, Debug)]
#[command(
    name = "watchdog",
    version,
    about = "Probe a primary and trigger failover when it stays down"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the watchdog loop
    Run(RunArgs),
    /// Probe the primary once
    Check(CheckArgs),
    /// Run the failover procedure once
    Failover(FailoverArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "watchdog.toml")]
    pub config: PathBuf,

    /// Override the health URL to probe
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override seconds between probes
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Override consecutive failures before failover
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Override seconds between successful failovers
    #[arg(long)]
    pub cooldown: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_listen: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "watchdog.toml")]
    pub config: PathBuf,

    /// Override the health URL to probe
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FailoverArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "watchdog.toml")]
    pub config: PathBuf,

    /// Print the command line without running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
    /// Print the effective configuration (file + environment)
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "watchdog.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "watchdog.toml")]
    pub config: PathBuf,

    /// Output as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load the file if present (defaults otherwise) and apply environment overrides.
pub fn load_config(path: &Path) -> Result<WatchdogConfig, ConfigError> {
    let config = if path.exists() {
        WatchdogConfig::load(Some(path))?
    } else {
        WatchdogConfig::default()
    };
    config.with_env_overrides()
}
