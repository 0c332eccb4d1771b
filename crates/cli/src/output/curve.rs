//! Table formatting for rate curve points.

use colored::Colorize;
use oni_rs_core::InterestParams;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::commands::CurvePoint;
use crate::units::{format_apy, format_percent};

#[derive(Tabled)]
struct CurveRow {
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Borrow Rate")]
    borrow_rate: String,
    #[tabled(rename = "Borrow APY")]
    borrow_apy: String,
    #[tabled(rename = "Segment")]
    segment: String,
}

fn format_params(params: &InterestParams) -> String {
    format!(
        "uOptimal {}  base {}  slope1 {}  slope2 {}",
        format_percent(params.u_optimal),
        format_percent(params.borrow_base),
        format_percent(params.r_slope1),
        format_percent(params.r_slope2),
    )
}

pub fn format_curve_table(params: &InterestParams, points: &[CurvePoint]) -> String {
    let rows: Vec<CurveRow> = points
        .iter()
        .map(|p| CurveRow {
            utilization: format_percent(p.utilization),
            borrow_rate: format_percent(p.borrow_rate),
            borrow_apy: format_apy(p.borrow_rate),
            segment: if p.above_kink { "steep" } else { "base" }.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()));

    format!("{}\n{}", format_params(params).dimmed(), table)
}
