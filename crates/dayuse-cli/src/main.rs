use std::io;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayuse_cli::commands::report::{self, View};
use dayuse_cli::commands::util;
use dayuse_cli::{Cli, Commands, Config};

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
        .with_writer(io::stderr)
        .try_init();

    let (view, args) = match &cli.command {
        Some(Commands::Report(args)) => (View::Full, args),
        Some(Commands::Apps(args)) => (View::Apps, args),
        Some(Commands::Categories(args)) => (View::Categories, args),
        Some(Commands::Hourly(args)) => (View::Hourly, args),
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    // Sampled once so the default date and any relative --now agree
    let clock = Utc::now();
    let request = util::prepare(args, &config, clock)?;

    let mut stdout = io::stdout().lock();
    report::run(&mut stdout, &request, view, args.json)?;

    Ok(())
}
