//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

/// Oni CLI - Explore the lending pool rate curve and replay scenarios
#[derive(Parser, Debug)]
#[command(name = "oni")]
#[command(about = "CLI tool for the Oni lending pool", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Pool config JSON (can also use ONI_CONFIG env var)
    #[arg(long, global = true, env = "ONI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Borrow rate at a single utilization
    Curve(CurveArgs),
    /// Borrow rates across a range of utilizations
    #[command(name = "curve-table")]
    CurveTable(CurveTableArgs),
    /// Replay a JSON scenario against a fresh pool
    Simulate(SimulateArgs),
}

/// Curve parameter overrides, in percent (e.g., "1.5")
#[derive(Args, Debug, Default)]
pub struct CurveParamArgs {
    /// Utilization at the kink
    #[arg(long)]
    pub u_optimal: Option<Decimal>,

    /// Rate at zero utilization
    #[arg(long)]
    pub borrow_base: Option<Decimal>,

    /// Rate added between zero and optimal utilization
    #[arg(long)]
    pub r_slope1: Option<Decimal>,

    /// Rate added between optimal and full utilization
    #[arg(long)]
    pub r_slope2: Option<Decimal>,
}

#[derive(Parser, Debug)]
pub struct CurveArgs {
    /// Utilization in percent (e.g., "75" or "62.5")
    pub utilization: Decimal,

    #[command(flatten)]
    pub params: CurveParamArgs,
}

#[derive(Parser, Debug)]
pub struct CurveTableArgs {
    /// Distance between rows, in percent
    #[arg(long, default_value = "10")]
    pub step: Decimal,

    /// Highest utilization shown, in percent
    #[arg(long, default_value = "100")]
    pub max: Decimal,

    #[command(flatten)]
    pub params: CurveParamArgs,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    /// Scenario file
    pub scenario: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
