//! Scenario file format for `oni simulate`.
//!
//! Amounts are decimal strings (or JSON numbers) in whole token units, rates
//! are percents, and accounts are referred to by name. `admin` and
//! `treasury` always resolve to the configured identities; listing them
//! under `accounts` only funds them.
//!
//! ```json
//! {
//!   "collateralPrice": "1300",
//!   "accounts": { "alice": { "base": "1000000" }, "bob": { "collateral": "10" } },
//!   "steps": [
//!     { "action": "mint", "account": "alice", "amount": "2000" },
//!     { "action": "borrow", "account": "bob", "collateral": "1", "amount": "1000" },
//!     { "action": "advance", "seconds": 31536000 },
//!     { "action": "repay", "account": "bob", "amount": "500" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use alloy_primitives::Address;
use oni_rs_core::PoolConfig;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Overrides the config given on the command line
    #[serde(default)]
    pub config: Option<PoolConfig>,
    /// Clock value at deployment, in seconds
    #[serde(default)]
    pub start: u64,
    /// USD per whole collateral unit
    pub collateral_price: Decimal,
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountSpec>,
    pub steps: Vec<Step>,
}

/// Genesis funding for a named account. Funded accounts approve the ledger
/// and the pool without limit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    /// Fixed address; derived from the name when omitted. Must match the
    /// configured identity for `admin` and `treasury`.
    pub address: Option<Address>,
    #[serde(default)]
    pub base: Decimal,
    #[serde(default)]
    pub collateral: Decimal,
    #[serde(default)]
    pub native: Decimal,
}

fn admin_name() -> String {
    "admin".to_string()
}

fn allowed() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Mint {
        account: String,
        amount: Decimal,
    },
    Burn {
        account: String,
        claims: Decimal,
    },
    Donate {
        account: String,
        amount: Decimal,
    },
    #[serde(rename_all = "camelCase")]
    Borrow {
        account: String,
        on_behalf_of: Option<String>,
        collateral: Decimal,
        amount: Decimal,
    },
    Repay {
        account: String,
        amount: Decimal,
    },
    WithdrawCollateral {
        account: String,
        amount: Decimal,
    },
    HelperBorrow {
        account: String,
        value: Decimal,
        amount: Decimal,
    },
    PoolBorrow {
        account: String,
        amount: Decimal,
    },
    Accrue {
        #[serde(default = "admin_name")]
        account: String,
    },
    Advance {
        seconds: u64,
    },
    #[serde(rename_all = "camelCase")]
    SetParams {
        #[serde(default = "admin_name")]
        account: String,
        u_optimal: Decimal,
        borrow_base: Decimal,
        r_slope1: Decimal,
        r_slope2: Decimal,
    },
    SetPoolPermission {
        #[serde(default = "admin_name")]
        account: String,
        pool: String,
        #[serde(default = "allowed")]
        allowed: bool,
    },
    SetPrice {
        price: Decimal,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::Mint { .. } => "mint",
            Step::Burn { .. } => "burn",
            Step::Donate { .. } => "donate",
            Step::Borrow { .. } => "borrow",
            Step::Repay { .. } => "repay",
            Step::WithdrawCollateral { .. } => "withdraw-collateral",
            Step::HelperBorrow { .. } => "helper-borrow",
            Step::PoolBorrow { .. } => "pool-borrow",
            Step::Accrue { .. } => "accrue",
            Step::Advance { .. } => "advance",
            Step::SetParams { .. } => "set-params",
            Step::SetPoolPermission { .. } => "set-pool-permission",
            Step::SetPrice { .. } => "set-price",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_scenario() {
        let json = r#"{
            "collateralPrice": "1300",
            "accounts": { "alice": { "base": "2000" }, "bob": { "collateral": 1.5 } },
            "steps": [
                { "action": "mint", "account": "alice", "amount": "2000" },
                { "action": "borrow", "account": "bob", "onBehalfOf": "alice", "collateral": "1", "amount": "1000" },
                { "action": "set-params", "uOptimal": "80", "borrowBase": "2", "rSlope1": "0.05", "rSlope2": "75" },
                { "action": "advance", "seconds": 60 }
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();

        assert_eq!(scenario.collateral_price, dec!(1300));
        assert_eq!(scenario.start, 0);
        assert_eq!(scenario.accounts["bob"].collateral, dec!(1.5));
        assert_eq!(scenario.accounts["bob"].base, Decimal::ZERO);
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(
            &scenario.steps[1],
            Step::Borrow { on_behalf_of: Some(name), .. } if name == "alice"
        ));
        assert!(matches!(
            &scenario.steps[2],
            Step::SetParams { account, r_slope1, .. } if account == "admin" && *r_slope1 == dec!(0.05)
        ));
        assert_eq!(scenario.steps[3].action(), "advance");
    }

    #[test]
    fn test_unknown_action_rejected() {
        let json = r#"{ "collateralPrice": "1", "steps": [ { "action": "liquidate" } ] }"#;
        assert!(serde_json::from_str::<Scenario>(json).is_err());
    }
}
