//! Scenario replay command implementation.

use anyhow::{Context, Result};
use oni_rs_core::PoolConfig;

use crate::cli::{OutputFormat, SimulateArgs};
use crate::output::format_simulation_report;
use crate::scenario::Scenario;
use crate::simulation::Simulation;

pub fn run_simulate(args: &SimulateArgs, format: OutputFormat, config: &PoolConfig) -> Result<()> {
    let path = &args.scenario;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))?;

    let config = scenario.config.clone().unwrap_or_else(|| config.clone());
    let mut simulation = Simulation::new(config, &scenario)?;
    let steps = simulation.run(&scenario.steps)?;
    let report = simulation.report(steps)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_simulation_report(&report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
    }

    Ok(())
}
