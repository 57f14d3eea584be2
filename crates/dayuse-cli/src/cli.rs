//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Daily app-usage summaries.
///
/// Reads recorded usage sessions and breaks one UTC day down by app,
/// by category, and by hour of day.
#[derive(Debug, Parser)]
#[command(name = "dayuse", version, about, long_about = None)]
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
    /// Full day report: totals, categories, apps, and hours.
    Report(DayArgs),

    /// Per-app totals with session counts.
    Apps(DayArgs),

    /// Per-category totals with share of the day.
    Categories(DayArgs),

    /// Per-app hour-of-day breakdown.
    Hourly(DayArgs),
}

/// Options shared by every day view.
#[derive(Debug, Clone, Args)]
pub struct DayArgs {
    /// Sessions JSON file, or `-` for stdin. Defaults to `sessions_path` from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Day to summarize (yyyy-MM-dd, UTC). Defaults to `target_date` from config, then today.
    #[arg(short, long)]
    pub date: Option<String>,

    /// Ignore time at or after this instant (RFC 3339, `now`, or e.g. "2 hours ago").
    #[arg(long)]
    pub now: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
