//! Price oracle collaborator.
//!
//! The pool values collateral through [`PriceOracle::latest_price`], which
//! returns a USD price with its own decimal scale (Chainlink feeds use 8).
//! A missing or zero price is rejected with [`OniError::OraclePriceInvalid`];
//! there is no staleness handling.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::OniError;
use crate::math::{mul_div_down, pow10};

/// A price quote: `value / 10^decimals` USD per whole unit of the asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePrice {
    pub value: U256,
    pub decimals: u8,
}

impl OraclePrice {
    pub fn new(value: U256, decimals: u8) -> Self {
        Self { value, decimals }
    }

    /// Values `amount` (in `asset_decimals`) in units with `quote_decimals`.
    ///
    /// The quote asset is assumed to be worth one USD per whole unit.
    pub fn quote(&self, amount: U256, asset_decimals: u8, quote_decimals: u8) -> U256 {
        mul_div_down(
            amount,
            self.value * pow10(quote_decimals),
            pow10(asset_decimals) * pow10(self.decimals),
        )
    }
}

/// Source of asset prices
pub trait PriceOracle {
    /// Latest price of `asset`, or `None` when the feed is unavailable
    fn latest_price(&self, asset: Address) -> Option<OraclePrice>;

    /// Latest price, rejecting unavailable and zero prices
    fn checked_price(&self, asset: Address) -> Result<OraclePrice, OniError> {
        match self.latest_price(asset) {
            Some(price) if !price.value.is_zero() => Ok(price),
            _ => Err(OniError::OraclePriceInvalid { asset }),
        }
    }
}

/// Oracle answering from a fixed table of prices, like a mock feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPriceOracle {
    prices: HashMap<Address, OraclePrice>,
}

impl FixedPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, asset: Address, price: OraclePrice) -> Self {
        self.set_price(asset, price);
        self
    }

    pub fn set_price(&mut self, asset: Address, price: OraclePrice) {
        self.prices.insert(asset, price);
    }

    pub fn remove_price(&mut self, asset: Address) {
        self.prices.remove(&asset);
    }
}

impl PriceOracle for FixedPriceOracle {
    fn latest_price(&self, asset: Address) -> Option<OraclePrice> {
        self.prices.get(&asset).copied()
    }
}
