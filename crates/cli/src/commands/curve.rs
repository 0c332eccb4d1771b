//! Rate curve command implementations.

use alloy_primitives::U256;
use anyhow::{bail, Result};
use oni_rs_core::{get_borrow_rate, InterestParams, PoolConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::cli::{CurveArgs, CurveParamArgs, CurveTableArgs, OutputFormat};
use crate::output::format_curve_table;
use crate::units::percent_to_wad;

/// Upper bound on rows in a curve table
const MAX_ROWS: usize = 1_000;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub utilization: U256,
    pub borrow_rate: U256,
    pub above_kink: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CurveJson<'a> {
    params: InterestParams,
    points: &'a [CurvePoint],
}

/// Applies the flag overrides on top of the configured parameters.
pub fn resolve_params(args: &CurveParamArgs, base: InterestParams) -> Result<InterestParams> {
    let pick = |flag: Option<Decimal>, current: U256| -> Result<U256> {
        flag.map_or(Ok(current), percent_to_wad)
    };

    let params = InterestParams::new(
        pick(args.u_optimal, base.u_optimal)?,
        pick(args.borrow_base, base.borrow_base)?,
        pick(args.r_slope1, base.r_slope1)?,
        pick(args.r_slope2, base.r_slope2)?,
    );
    params.validate()?;
    Ok(params)
}

fn point(utilization: U256, params: &InterestParams) -> CurvePoint {
    CurvePoint {
        utilization,
        borrow_rate: get_borrow_rate(utilization, params),
        above_kink: utilization >= params.u_optimal,
    }
}

fn print_points(params: &InterestParams, points: &[CurvePoint], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", format_curve_table(params, points));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&CurveJson {
                params: *params,
                points,
            })?;
            println!("{}", json);
        }
    }
    Ok(())
}

pub fn run_curve(args: &CurveArgs, format: OutputFormat, config: &PoolConfig) -> Result<()> {
    let params = resolve_params(&args.params, config.interest_params)?;
    let utilization = percent_to_wad(args.utilization)?;

    print_points(&params, &[point(utilization, &params)], format)
}

pub fn run_curve_table(args: &CurveTableArgs, format: OutputFormat, config: &PoolConfig) -> Result<()> {
    let params = resolve_params(&args.params, config.interest_params)?;
    if args.step <= Decimal::ZERO {
        bail!("--step must be positive");
    }

    let step = percent_to_wad(args.step)?;
    let max = percent_to_wad(args.max)?;

    let mut points = Vec::new();
    let mut utilization = U256::ZERO;
    while utilization <= max {
        if points.len() == MAX_ROWS {
            bail!("--step {} yields more than {MAX_ROWS} rows", args.step);
        }
        points.push(point(utilization, &params));
        utilization += step;
    }

    debug!(rows = points.len(), "built curve table");
    print_points(&params, &points, format)
}
