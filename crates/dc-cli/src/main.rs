use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dc_cli::commands::{events, input, report, zones};
use dc_cli::{Cli, Commands, Config};
use dc_core::ZoneRegistry;

/// Load config and validate it into a zone registry.
fn load_registry(config_path: Option<&Path>) -> Result<ZoneRegistry> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(
        zones = config.zones.len(),
        airports = config.airports.len(),
        "loaded configuration"
    );

    config.registry().context("invalid zone configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let registry = load_registry(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Report {
            input: args,
            as_of,
            json,
        }) => {
            let events = input::read_events(args.file.as_deref())?;
            report::run(&mut out, &events, &registry, as_of, json)?;
        }
        Some(Commands::Events { input: args }) => {
            let events = input::read_events(args.file.as_deref())?;
            events::run(&mut out, &events, &registry)?;
        }
        Some(Commands::Zones) => {
            zones::run(&mut out, &registry)?;
        }
        None => {
            // No subcommand: report on the calendar in the current directory
            let events = input::read_events(None)?;
            report::run(&mut out, &events, &registry, None, false)?;
        }
    }

    Ok(())
}
