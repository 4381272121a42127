//! Percentage arithmetic on cent amounts.
//!
//! This is the only place a percentage is applied to money.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::DistributionError;

/// Fractional digits allowed in a performance percentage (NUMERIC(7,4)).
pub const PERCENT_SCALE: u32 = 4;

/// Returns `round_half_up(base_cents × percent / 100)`, ties away from zero.
///
/// Returns `None` on overflow.
#[must_use]
pub fn apply_percent(base_cents: i64, percent: Decimal) -> Option<i64> {
    Decimal::from(base_cents)
        .checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Checks that a percentage fits NUMERIC(7,4): at most 4 decimals and |p| < 1000.
pub fn validate_percent(percent: Decimal) -> Result<Decimal, DistributionError> {
    if percent.normalize().scale() > PERCENT_SCALE {
        return Err(DistributionError::validation(
            "performance_percent",
            format!("at most {PERCENT_SCALE} decimal places"),
        ));
    }
    if percent.abs() >= Decimal::ONE_THOUSAND {
        return Err(DistributionError::validation(
            "performance_percent",
            "must be between -999.9999 and 999.9999",
        ));
    }
    Ok(percent)
}
