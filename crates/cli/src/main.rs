//! Oni CLI - Explore the lending pool rate curve and replay scenarios.

mod cli;
mod commands;
mod config;
mod output;
mod scenario;
mod simulation;
mod units;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use commands::{run_curve, run_curve_table, run_simulate};
use config::load_config;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Curve(args) => {
            run_curve(&args, cli.format, &config)?;
        }
        Commands::CurveTable(args) => {
            run_curve_table(&args, cli.format, &config)?;
        }
        Commands::Simulate(args) => {
            run_simulate(&args, cli.format, &config)?;
        }
    }

    Ok(())
}
