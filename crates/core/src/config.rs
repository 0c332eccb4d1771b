//! Deployment configuration for a protocol instance.
//!
//! A [`PoolConfig`] is everything an initializer would receive: administrator
//! and treasury identities, contract addresses, asset decimals, curve
//! parameters and the risk/fee fractions. Every field has a default, so a
//! JSON config only needs to name what it overrides.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::OniError;
use crate::irm::InterestParams;
use crate::math::WAD;

/// Default liquidation threshold (90%)
pub const DEFAULT_LIQUIDATION_THRESHOLD: U256 =
    U256::from_limbs([900_000_000_000_000_000, 0, 0, 0]);

/// Default treasury share of fees and interest (10%)
pub const DEFAULT_TREASURY_SHARE: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Default share of total assets withheld from borrowable liquidity (10%)
pub const DEFAULT_RESERVE_FACTOR: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Addresses of the contracts making up one deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentAddresses {
    pub base_token: Address,
    pub collateral_token: Address,
    pub ledger: Address,
    pub pool: Address,
    pub helper: Address,
}

impl Default for DeploymentAddresses {
    fn default() -> Self {
        Self {
            base_token: Address::with_last_byte(0xB0),
            collateral_token: Address::with_last_byte(0xC0),
            ledger: Address::with_last_byte(0xD0),
            pool: Address::with_last_byte(0xE0),
            helper: Address::with_last_byte(0xF0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolConfig {
    /// Identity allowed to change curve parameters, permissions and treasury
    pub admin: Address,
    /// Recipient of the protocol's share of fees and interest
    pub treasury: Address,
    pub addresses: DeploymentAddresses,
    pub base_symbol: String,
    pub base_decimals: u8,
    pub collateral_symbol: String,
    pub collateral_decimals: u8,
    pub interest_params: InterestParams,
    /// Fraction of collateral value that may be borrowed (WAD)
    pub liquidation_threshold: U256,
    /// Fraction of origination fees and accrued interest routed to the treasury (WAD)
    pub treasury_share: U256,
    /// Fraction of total assets excluded from the utilization denominator (WAD)
    pub reserve_factor: U256,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            admin: Address::with_last_byte(0x01),
            treasury: Address::with_last_byte(0x02),
            addresses: DeploymentAddresses::default(),
            base_symbol: "BEAN".to_string(),
            base_decimals: 6,
            collateral_symbol: "WETH".to_string(),
            collateral_decimals: 18,
            interest_params: InterestParams::default(),
            liquidation_threshold: DEFAULT_LIQUIDATION_THRESHOLD,
            treasury_share: DEFAULT_TREASURY_SHARE,
            reserve_factor: DEFAULT_RESERVE_FACTOR,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), OniError> {
        self.interest_params.validate()?;

        if self.liquidation_threshold.is_zero() || self.liquidation_threshold > WAD {
            return Err(OniError::invalid_params(format!(
                "liquidation threshold {} must be in (0, 100%]",
                self.liquidation_threshold
            )));
        }
        if self.treasury_share > WAD {
            return Err(OniError::invalid_params(format!(
                "treasury share {} exceeds 100%",
                self.treasury_share
            )));
        }
        if self.reserve_factor >= WAD {
            return Err(OniError::invalid_params(format!(
                "reserve factor {} must be below 100%",
                self.reserve_factor
            )));
        }
        if self.base_decimals > 36 || self.collateral_decimals > 36 {
            return Err(OniError::invalid_params("token decimals above 36"));
        }
        Ok(())
    }
}
