//! Two-segment kink interest rate model.
//!
//! The borrow rate is a piecewise-linear function of pool utilization:
//!
//! ```text
//! If utilization < u_optimal:
//!     rate = borrow_base + utilization * r_slope1 / u_optimal
//! Otherwise:
//!     rate = borrow_base + r_slope1
//!          + (utilization - u_optimal) * r_slope2 / (1 - u_optimal)
//! ```
//!
//! Below the kink the curve is gentle; above it `r_slope2` is typically much
//! steeper so borrowing becomes expensive before the pool is drained. All
//! values are annual rates scaled by [`WAD`].
//!
//! # Default parameters
//!
//! | Parameter | Value | Description |
//! |-----------|-------|-------------|
//! | `u_optimal` | 60% | Kink utilization |
//! | `borrow_base` | 1.5% | Rate at zero utilization |
//! | `r_slope1` | 1% | Rate added across the first segment |
//! | `r_slope2` | 80% | Rate added across the second segment |
//!
//! # Example
//!
//! ```rust
//! use oni_rs_core::irm::{get_borrow_rate, get_utilization_rate, InterestParams};
//! use alloy_primitives::U256;
//!
//! let params = InterestParams::default();
//! let utilization = get_utilization_rate(U256::from(300), U256::from(900));
//! let rate = get_borrow_rate(utilization, &params);
//! assert!(rate > params.borrow_base);
//! ```

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::OniError;
use crate::math::{mul_div_down, w_div_down, WAD};

/// Default kink utilization (60%)
pub const DEFAULT_U_OPTIMAL: U256 = U256::from_limbs([600_000_000_000_000_000, 0, 0, 0]);

/// Default base borrow rate (1.5%)
pub const DEFAULT_BORROW_BASE: U256 = U256::from_limbs([15_000_000_000_000_000, 0, 0, 0]);

/// Default first-segment slope (1%)
pub const DEFAULT_R_SLOPE1: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Default second-segment slope (80%)
pub const DEFAULT_R_SLOPE2: U256 = U256::from_limbs([800_000_000_000_000_000, 0, 0, 0]);

/// Curve parameters, all WAD-scaled annual rates (1e18 = 100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestParams {
    /// Utilization at the kink, in `[0, WAD]`
    pub u_optimal: U256,
    /// Rate charged at zero utilization
    pub borrow_base: U256,
    /// Rate added between zero utilization and the kink
    pub r_slope1: U256,
    /// Rate added between the kink and full utilization
    pub r_slope2: U256,
}

impl Default for InterestParams {
    fn default() -> Self {
        Self {
            u_optimal: DEFAULT_U_OPTIMAL,
            borrow_base: DEFAULT_BORROW_BASE,
            r_slope1: DEFAULT_R_SLOPE1,
            r_slope2: DEFAULT_R_SLOPE2,
        }
    }
}

impl InterestParams {
    pub fn new(u_optimal: U256, borrow_base: U256, r_slope1: U256, r_slope2: U256) -> Self {
        Self {
            u_optimal,
            borrow_base,
            r_slope1,
            r_slope2,
        }
    }

    /// Checks the parameter bounds.
    ///
    /// Slopes and base are unsigned so only the kink needs a range check.
    pub fn validate(&self) -> Result<(), OniError> {
        if self.u_optimal > WAD {
            return Err(OniError::invalid_params(format!(
                "u_optimal {} exceeds 100%",
                self.u_optimal
            )));
        }
        Ok(())
    }
}

/// Utilization as `floor(borrowed * WAD / liquidity)`.
///
/// Returns zero for an empty pool. Not capped at 100%: an over-borrowed pool
/// reports a utilization above `WAD`.
pub fn get_utilization_rate(borrowed: U256, liquidity: U256) -> U256 {
    if liquidity.is_zero() {
        return U256::ZERO;
    }
    w_div_down(borrowed, liquidity)
}

/// Borrow rate on the kink curve.
///
/// A zero `u_optimal` collapses the first segment, so every utilization is
/// priced on the second one. A `u_optimal` of 100% leaves only the first
/// segment plus `r_slope1` for utilizations at or above 100%.
pub fn get_borrow_rate(utilization: U256, params: &InterestParams) -> U256 {
    if utilization < params.u_optimal {
        return params.borrow_base + mul_div_down(utilization, params.r_slope1, params.u_optimal);
    }

    let excess = utilization - params.u_optimal;
    let remaining = WAD.saturating_sub(params.u_optimal);
    let steep = if remaining.is_zero() {
        U256::ZERO
    } else {
        mul_div_down(excess, params.r_slope2, remaining)
    };

    params.borrow_base + params.r_slope1 + steep
}
