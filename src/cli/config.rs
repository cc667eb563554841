//! Config command handlers

use crate::cli::{load_config, ConfigInitArgs, ConfigShowArgs};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../watchdog.example.toml");

/// Handle `watchdog config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Set probe.url (or PRIMARY_HEALTH_URL) before running the watchdog.");

    Ok(())
}

/// Handle `watchdog config show` command
///
/// Prints the configuration the watchdog would run with: file values merged
/// with environment overrides. Does not validate.
pub fn handle_config_show(args: &ConfigShowArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    if args.json {
        Ok(serde_json::to_string_pretty(&config)?)
    } else {
        Ok(toml::to_string_pretty(&config)?)
    }
}
