//! Conversions between human-readable decimals and fixed-point `U256`.

use alloy_primitives::U256;
use anyhow::{anyhow, bail, Result};
use oni_rs_core::math::{rate_to_apy, rate_to_f64};
use rust_decimal::Decimal;

/// Scales `amount` by `10^decimals`, rejecting negative values and precision
/// finer than one unit.
pub fn parse_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() {
        bail!("amount {amount} is negative");
    }

    // Decimal carries at most 28 fractional digits, so split the scaling
    let mantissa = amount.mantissa().unsigned_abs();
    let scale = amount.scale();
    let decimals = u32::from(decimals);
    if scale > decimals {
        let dropped = scale - decimals;
        let divisor = 10u128
            .checked_pow(dropped)
            .ok_or_else(|| anyhow!("amount {amount} has too many decimal places"))?;
        if mantissa % divisor != 0 {
            bail!("amount {amount} has more than {decimals} decimal places");
        }
        return Ok(U256::from(mantissa / divisor));
    }

    let shift = U256::from(10u64).pow(U256::from(decimals - scale));
    Ok(U256::from(mantissa) * shift)
}

/// Parses a percent string into a WAD-scaled fraction (`"1.5"` is 1.5%).
pub fn percent_to_wad(percent: Decimal) -> Result<U256> {
    parse_units(percent, 16)
}

/// Renders `value` with `decimals` fractional digits, trimming trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / unit;
    let frac = value % unit;
    if frac.is_zero() {
        return whole.to_string();
    }

    let digits = frac.to_string();
    let padded = format!("{}{}", "0".repeat(usize::from(decimals) - digits.len()), digits);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

pub fn format_percent(rate: U256) -> String {
    format!("{:.2}%", rate_to_f64(rate) * 100.0)
}

pub fn format_apy(rate: U256) -> String {
    format!("{:.2}%", rate_to_apy(rate) * 100.0)
}
