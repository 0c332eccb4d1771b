//! Output formatting for simulation reports.

use colored::Colorize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::simulation::{AccountReport, SimulationReport, StepOutcome};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    timestamp: u64,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Result")]
    result: String,
}

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Account")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Base")]
    base_balance: String,
    #[tabled(rename = "Claims")]
    claim_balance: String,
    #[tabled(rename = "Collateral")]
    collateral_posted: String,
    #[tabled(rename = "Debt")]
    debt: String,
    #[tabled(rename = "Available")]
    available_to_borrow: String,
    #[tabled(rename = "Health")]
    health: String,
}

fn truncate_address(addr: &str) -> String {
    if addr.len() > 10 {
        format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
    } else {
        addr.to_string()
    }
}

fn step_row(step: &StepOutcome) -> StepRow {
    let result = if step.ok {
        step.detail.green().to_string()
    } else {
        format!("rejected: {}", step.detail).red().to_string()
    };
    StepRow {
        index: step.index,
        timestamp: step.timestamp,
        action: step.action.to_string(),
        result,
    }
}

fn account_row(account: &AccountReport) -> AccountRow {
    AccountRow {
        name: account.name.clone(),
        address: truncate_address(&format!("{}", account.address)),
        base_balance: account.base_balance.clone(),
        claim_balance: account.claim_balance.clone(),
        collateral_posted: account.collateral_posted.clone(),
        debt: account.debt.clone(),
        available_to_borrow: account
            .available_to_borrow
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        health: account.health.clone().unwrap_or_else(|| "-".to_string()),
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::left()));
    table.to_string()
}

pub fn format_simulation_report(report: &SimulationReport) -> String {
    let mut output = String::new();
    let pool = &report.pool;
    let base = &report.base_symbol;

    // Steps
    output.push_str(&format!("{}\n", "Steps".cyan().bold()));
    if report.steps.is_empty() {
        output.push_str("  No steps.\n");
    } else {
        let rows: Vec<StepRow> = report.steps.iter().map(step_row).collect();
        output.push_str(&format!("{}\n", styled(Table::new(rows))));
    }
    output.push('\n');

    // Pool
    output.push_str(&format!("{}\n", "Pool".cyan().bold()));
    output.push_str(&format!("  Time:           {}\n", pool.timestamp));
    output.push_str(&format!("  Idle Liquidity: {} {}\n", pool.total_base_held, base));
    output.push_str(&format!("  Total Debts:    {} {}\n", pool.total_debts, base));
    output.push_str(&format!("  Claim Supply:   {}\n", pool.total_claim_supply));
    output.push_str(&format!("  Rate:           {} {} per claim\n", pool.rate, base));
    output.push_str(&format!("  Utilization:    {}\n", pool.utilization));
    output.push_str(&format!("  Borrow Rate:    {} (APY {})\n", pool.borrow_rate, pool.borrow_apy));
    output.push_str(&format!("  Supply Rate:    {}\n", pool.supply_rate));
    output.push_str(&format!("  Borrow Index:   {}\n\n", pool.borrow_index));

    // Accounts
    output.push_str(&format!("{}\n", "Accounts".cyan().bold()));
    let rows: Vec<AccountRow> = report.accounts.iter().map(account_row).collect();
    output.push_str(&styled(Table::new(rows)));
    output.push('\n');

    if report.steps.iter().any(|s| !s.ok) {
        output.push_str(&format!(
            "\n{}\n",
            "Some steps were rejected; their state changes were rolled back.".yellow()
        ));
    }

    output
}
