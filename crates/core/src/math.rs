//! WAD fixed-point arithmetic shared by the rate curve, ledger and pool.
//!
//! Every rate, ratio and index is a `U256` scaled by [`WAD`] (1e18 = 100%).
//! Amounts stay in the native decimals of their token. All helpers truncate
//! toward zero.

use alloy_primitives::{U256, U512};

/// 1e18, the fixed-point scale for rates, ratios and the debt index
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Seconds in a 365-day year; curve rates are annual
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// `x * y / d` rounded down, with a 512-bit intermediate product.
///
/// Returns `None` when `d` is zero or the quotient exceeds 256 bits.
pub fn checked_mul_div_down(x: U256, y: U256, d: U256) -> Option<U256> {
    if d.is_zero() {
        return None;
    }
    let quotient = U512::from(x) * U512::from(y) / U512::from(d);
    U256::checked_from_limbs_slice(quotient.as_limbs())
}

/// `x * y / d` rounded down. Returns zero when `d` is zero and saturates at
/// `U256::MAX` when the quotient does not fit.
pub fn mul_div_down(x: U256, y: U256, d: U256) -> U256 {
    if d.is_zero() {
        return U256::ZERO;
    }
    checked_mul_div_down(x, y, d).unwrap_or(U256::MAX)
}

/// `x * y / WAD` rounded down
pub fn w_mul_down(x: U256, y: U256) -> U256 {
    mul_div_down(x, y, WAD)
}

/// `x * WAD / y` rounded down
pub fn w_div_down(x: U256, y: U256) -> U256 {
    mul_div_down(x, WAD, y)
}

/// Third-order Taylor expansion of `e^(x*n) - 1`, WAD-scaled.
///
/// `x` is a per-second rate and `n` a number of seconds.
pub fn w_taylor_compounded(x: U256, n: U256) -> U256 {
    let first_term = x.saturating_mul(n);
    let second_term = mul_div_down(first_term, first_term, U256::from(2) * WAD);
    let third_term = mul_div_down(second_term, first_term, U256::from(3) * WAD);

    first_term.saturating_add(second_term).saturating_add(third_term)
}

/// `x - y`, floored at zero
pub fn zero_floor_sub(x: U256, y: U256) -> U256 {
    x.saturating_sub(y)
}

pub fn min(a: U256, b: U256) -> U256 {
    if a < b {
        a
    } else {
        b
    }
}

/// `10^decimals` as a `U256`
pub fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Converts an annual WAD rate to a per-second WAD rate
pub fn per_second(annual_rate: U256) -> U256 {
    annual_rate / U256::from(SECONDS_PER_YEAR)
}

/// Converts a WAD-scaled value to `f64` (1e18 -> 1.0)
pub fn rate_to_f64(rate: U256) -> f64 {
    let whole = rate / WAD;
    let frac = rate % WAD;
    whole.saturating_to::<u128>() as f64 + frac.saturating_to::<u128>() as f64 / 1e18
}

/// Converts an annual WAD rate to a continuously compounded APY
pub fn rate_to_apy(annual_rate: U256) -> f64 {
    rate_to_f64(annual_rate).exp_m1()
}
