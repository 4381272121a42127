//! Conversions between decimal currency amounts and integer cents.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Ledger amounts are stored as `i64` cents; `Decimal` is only used at the edges.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a decimal amount (e.g. `12.345`) to cents, rounding half away from zero.
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn decimal_to_cents(amount: Decimal) -> Option<i64> {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
}

/// Converts cents to a two-decimal amount.
#[must_use]
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
