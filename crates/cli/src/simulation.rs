//! Replays a [`Scenario`] against a fresh protocol deployment.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, U256};
use anyhow::{anyhow, bail, Context, Result};
use oni_rs_core::{
    CallContext, FixedPriceOracle, InterestParams, OniError, OraclePrice, PoolConfig, Protocol,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{Scenario, Step};
use crate::units::{format_apy, format_percent, format_units, parse_units, percent_to_wad};

/// Decimals of the simulated price feed
const PRICE_DECIMALS: u8 = 8;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub timestamp: u64,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    pub timestamp: u64,
    pub total_base_held: String,
    pub total_debts: String,
    pub total_claim_supply: String,
    pub rate: String,
    pub utilization: String,
    pub borrow_rate: String,
    pub borrow_apy: String,
    pub supply_rate: String,
    pub borrow_index: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    pub name: String,
    pub address: Address,
    pub base_balance: String,
    pub claim_balance: String,
    pub collateral_posted: String,
    pub debt: String,
    /// `None` without a collateral price
    pub available_to_borrow: Option<String>,
    /// `None` without debt or without a collateral price
    pub health: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub base_symbol: String,
    pub collateral_symbol: String,
    pub steps: Vec<StepOutcome>,
    pub pool: PoolReport,
    pub accounts: Vec<AccountReport>,
}

/// Deterministic address for a named account
pub fn named_address(name: &str) -> Address {
    Address::from_word(keccak256(name.as_bytes()))
}

fn oracle_price(usd: Decimal) -> Result<OraclePrice> {
    Ok(OraclePrice::new(parse_units(usd, PRICE_DECIMALS)?, PRICE_DECIMALS))
}

pub struct Simulation {
    protocol: Protocol<FixedPriceOracle>,
    accounts: BTreeMap<String, Address>,
    now: u64,
}

impl Simulation {
    /// Deploys the pool and funds the scenario's accounts.
    pub fn new(config: PoolConfig, scenario: &Scenario) -> Result<Self> {
        let addrs = config.addresses;
        let oracle = FixedPriceOracle::new()
            .with_price(addrs.collateral_token, oracle_price(scenario.collateral_price)?);

        let mut accounts = BTreeMap::new();
        accounts.insert("admin".to_string(), config.admin);
        accounts.insert("treasury".to_string(), config.treasury);

        let base_decimals = config.base_decimals;
        let collateral_decimals = config.collateral_decimals;
        let mut protocol =
            Protocol::new(config, oracle, scenario.start).context("Invalid pool config")?;

        for (name, spec) in &scenario.accounts {
            let address = match (accounts.get(name), spec.address) {
                (Some(&reserved), Some(explicit)) if explicit != reserved => bail!(
                    "Account '{name}' is reserved for {reserved}, but the scenario gives {explicit}"
                ),
                (Some(&reserved), _) => reserved,
                (None, explicit) => explicit.unwrap_or_else(|| named_address(name)),
            };
            let context = || format!("Failed to fund account '{name}'");

            protocol
                .fund(addrs.base_token, address, parse_units(spec.base, base_decimals)?)
                .with_context(context)?;
            protocol
                .fund(
                    addrs.collateral_token,
                    address,
                    parse_units(spec.collateral, collateral_decimals)?,
                )
                .with_context(context)?;
            protocol.fund_native(address, parse_units(spec.native, collateral_decimals)?);

            for spender in [addrs.ledger, addrs.pool] {
                protocol
                    .approve(addrs.base_token, address, spender, U256::MAX)
                    .with_context(context)?;
            }
            protocol
                .approve(addrs.collateral_token, address, addrs.pool, U256::MAX)
                .with_context(context)?;

            debug!(%name, %address, "funded account");
            accounts.insert(name.clone(), address);
        }

        Ok(Self {
            protocol,
            accounts,
            now: scenario.start,
        })
    }

    fn resolve(&self, name: &str) -> Result<Address> {
        if let Some(address) = self.accounts.get(name) {
            return Ok(*address);
        }
        name.parse::<Address>()
            .map_err(|_| anyhow!("Unknown account '{name}'"))
    }

    fn ctx(&self, name: &str) -> Result<CallContext> {
        Ok(CallContext::new(self.resolve(name)?, self.now))
    }

    fn base(&self, amount: Decimal) -> Result<U256> {
        parse_units(amount, self.protocol.config().base_decimals)
    }

    fn collateral(&self, amount: Decimal) -> Result<U256> {
        parse_units(amount, self.protocol.config().collateral_decimals)
    }

    fn show_base(&self, amount: U256) -> String {
        let config = self.protocol.config();
        format!("{} {}", format_units(amount, config.base_decimals), config.base_symbol)
    }

    /// Runs every step in order. A step rejected by the protocol is recorded
    /// and leaves the state untouched; malformed steps abort the run.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let result = self
                .apply(step)
                .with_context(|| format!("Step {index} ({}) is invalid", step.action()))?;

            let (ok, detail) = match result {
                Ok(detail) => (true, detail),
                Err(err) => (false, err.to_string()),
            };
            info!(index, action = step.action(), ok, %detail, "step");
            outcomes.push(StepOutcome {
                index,
                action: step.action(),
                timestamp: self.now,
                ok,
                detail,
            });
        }
        Ok(outcomes)
    }

    /// Applies one step. The outer error is a malformed step, the inner one
    /// a protocol rejection.
    fn apply(&mut self, step: &Step) -> Result<Result<String, OniError>> {
        let outcome = match step {
            Step::Mint { account, amount } => {
                let (ctx, amount) = (self.ctx(account)?, self.base(*amount)?);
                let claim_decimals = self.protocol.config().base_decimals;
                self.protocol
                    .mint(&ctx, amount)
                    .map(|claims| format!("minted {} claims", format_units(claims, claim_decimals)))
            }
            Step::Burn { account, claims } => {
                let (ctx, claims) = (self.ctx(account)?, self.base(*claims)?);
                self.protocol
                    .burn(&ctx, claims)
                    .map(|paid| format!("redeemed {}", self.show_base(paid)))
            }
            Step::Donate { account, amount } => {
                let (ctx, amount) = (self.ctx(account)?, self.base(*amount)?);
                self.protocol
                    .donate(&ctx, amount)
                    .map(|()| format!("donated {}", self.show_base(amount)))
            }
            Step::Borrow {
                account,
                on_behalf_of,
                collateral,
                amount,
            } => {
                let ctx = self.ctx(account)?;
                let receiver = match on_behalf_of {
                    Some(name) => self.resolve(name)?,
                    None => ctx.sender,
                };
                let (collateral, amount) = (self.collateral(*collateral)?, self.base(*amount)?);
                self.protocol
                    .borrow(&ctx, receiver, collateral, amount)
                    .map(|net| format!("received {}", self.show_base(net)))
            }
            Step::Repay { account, amount } => {
                let (ctx, amount) = (self.ctx(account)?, self.base(*amount)?);
                self.protocol
                    .repay(&ctx, amount)
                    .map(|left| format!("remaining debt {}", self.show_base(left)))
            }
            Step::WithdrawCollateral { account, amount } => {
                let (ctx, amount) = (self.ctx(account)?, self.collateral(*amount)?);
                let config = self.protocol.config();
                let (decimals, symbol) = (config.collateral_decimals, config.collateral_symbol.clone());
                self.protocol.withdraw_collateral(&ctx, amount).map(|left| {
                    format!("remaining collateral {} {symbol}", format_units(left, decimals))
                })
            }
            Step::HelperBorrow {
                account,
                value,
                amount,
            } => {
                let ctx = self.ctx(account)?;
                let (value, amount) = (self.collateral(*value)?, self.base(*amount)?);
                self.protocol
                    .helper_borrow(&ctx, value, amount)
                    .map(|net| format!("received {}", self.show_base(net)))
            }
            Step::PoolBorrow { account, amount } => {
                let (ctx, amount) = (self.ctx(account)?, self.base(*amount)?);
                self.protocol
                    .pool_borrow(&ctx, amount)
                    .map(|()| format!("drew {}", self.show_base(amount)))
            }
            Step::Accrue { account } => {
                let ctx = self.ctx(account)?;
                self.protocol
                    .accrue_interest(&ctx)
                    .map(|accrual| format!("accrued {}", self.show_base(accrual.interest)))
            }
            Step::Advance { seconds } => {
                self.now = self
                    .now
                    .checked_add(*seconds)
                    .ok_or_else(|| anyhow!("clock overflow"))?;
                Ok(format!("clock at {}", self.now))
            }
            Step::SetParams {
                account,
                u_optimal,
                borrow_base,
                r_slope1,
                r_slope2,
            } => {
                let ctx = self.ctx(account)?;
                let params = InterestParams::new(
                    percent_to_wad(*u_optimal)?,
                    percent_to_wad(*borrow_base)?,
                    percent_to_wad(*r_slope1)?,
                    percent_to_wad(*r_slope2)?,
                );
                self.protocol
                    .set_interest_params(&ctx, params)
                    .map(|()| "curve updated".to_string())
            }
            Step::SetPoolPermission {
                account,
                pool,
                allowed,
            } => {
                let (ctx, pool) = (self.ctx(account)?, self.resolve(pool)?);
                self.protocol
                    .set_pool_permission(&ctx, pool, *allowed)
                    .map(|()| format!("pool permission for {pool} set to {allowed}"))
            }
            Step::SetPrice { price } => {
                let asset = self.protocol.config().addresses.collateral_token;
                let price = oracle_price(*price)?;
                self.protocol.oracle_mut().set_price(asset, price);
                Ok(format!("price set to {}", format_units(price.value, PRICE_DECIMALS)))
            }
        };
        Ok(outcome)
    }

    pub fn report(&self, steps: Vec<StepOutcome>) -> Result<SimulationReport> {
        let config = self.protocol.config();
        let base_decimals = config.base_decimals;
        let summary = self.protocol.summary()?;

        let pool = PoolReport {
            timestamp: self.now,
            total_base_held: format_units(summary.total_base_held, base_decimals),
            total_debts: format_units(summary.total_debts, base_decimals),
            total_claim_supply: format_units(summary.total_claim_supply, base_decimals),
            rate: format_units(summary.rate, base_decimals),
            utilization: format_percent(summary.utilization_rate),
            borrow_rate: format_percent(summary.borrow_rate),
            borrow_apy: format_apy(summary.borrow_rate),
            supply_rate: format_percent(summary.supply_rate),
            borrow_index: format_units(summary.borrow_index, 18),
        };

        let accounts = self
            .accounts
            .iter()
            .map(|(name, address)| self.account_report(name, *address))
            .collect::<Result<Vec<_>>>()?;

        Ok(SimulationReport {
            base_symbol: config.base_symbol.clone(),
            collateral_symbol: config.collateral_symbol.clone(),
            steps,
            pool,
            accounts,
        })
    }

    fn account_report(&self, name: &str, address: Address) -> Result<AccountReport> {
        let config = self.protocol.config();
        let base_decimals = config.base_decimals;
        let position = self.protocol.position(address);
        let debt = self.protocol.account_debt(address);

        let info = self.protocol.get_account_borrow_info(address).ok();
        let available_to_borrow = info
            .as_ref()
            .map(|info| format_units(info.available_to_borrow_in_base, base_decimals));
        let health = info
            .filter(|info| !info.debt_in_base.is_zero())
            .map(|info| format_units(info.health, base_decimals));

        Ok(AccountReport {
            name: name.to_string(),
            address,
            base_balance: format_units(self.protocol.base_balance_of(address)?, base_decimals),
            claim_balance: format_units(self.protocol.claim_balance_of(address), base_decimals),
            collateral_posted: format_units(position.collateral, config.collateral_decimals),
            debt: format_units(debt, base_decimals),
            available_to_borrow,
            health,
        })
    }
}
