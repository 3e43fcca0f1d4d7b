//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Residency day calculator.
///
/// Reads a calendar export, works out which zone you were in on each day and
/// reports rolling-window usage and mandatory exit dates per zone.
#[derive(Debug, Parser)]
#[command(name = "dc", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show per-zone usage, exit dates and the itinerary (default).
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Evaluate as of this date (YYYY-MM-DD) instead of the last calendar day.
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List classified events.
    Events {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the configured zones.
    Zones,
}

/// Calendar input selection.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Calendar export (.ics). Defaults to the first one in the current directory.
    pub file: Option<PathBuf>,
}
