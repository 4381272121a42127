//! Balance engine types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::withdrawal::WithdrawalType;

/// Default holding period before approved capital may be redeemed.
pub const DEFAULT_MATURITY_WINDOW_DAYS: u32 = 90;

/// Tunable eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePolicy {
    /// Days an investment must have been recognized before it is liquid.
    pub maturity_window_days: u32,
}

impl Default for BalancePolicy {
    fn default() -> Self {
        Self {
            maturity_window_days: DEFAULT_MATURITY_WINDOW_DAYS,
        }
    }
}

/// Resolved boundaries for one point-in-time balance query.
///
/// Instant bounds are exclusive: a record counts when its timestamp is
/// strictly before the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCutoffs {
    /// Reference date D.
    pub reference_date: NaiveDate,
    /// D minus the maturity window.
    pub capital_cutoff_date: NaiveDate,
    /// End of D in UTC; bounds recognition, ledger entries and settlements.
    pub recognized_before: DateTime<Utc>,
    /// End of the capital cutoff date in UTC; bounds liquid capital.
    pub liquid_before: DateTime<Utc>,
}

/// Raw sums produced by the store (or by folding in-memory records).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAggregates {
    /// Approved investments recognized as of D.
    pub approved_capital_cents: i64,
    /// Approved investments recognized as of D minus the maturity window.
    pub liquid_capital_cents: i64,
    /// Reserving capital redemptions scheduled on or before D (or unscheduled).
    pub capital_reserved_cents: i64,
    /// Result ledger entries recorded on or before D; may be negative.
    pub result_ledger_cents: i64,
    /// Reserving result settlements requested on or before D.
    pub result_reserved_cents: i64,
    /// Pending capital redemptions, any date.
    pub pending_capital_cents: i64,
    /// Pending result settlements, any date.
    pub pending_result_cents: i64,
}

/// Point-in-time eligibility figures for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Reference date D.
    pub reference_date: NaiveDate,
    /// D minus the maturity window.
    pub capital_cutoff_date: NaiveDate,
    /// Approved investments recognized as of D.
    pub approved_capital_cents: i64,
    /// Approved investments past the maturity window.
    pub liquid_capital_cents: i64,
    /// Capital held by in-flight or paid redemptions.
    pub capital_reserved_cents: i64,
    /// Net result ledger as of D.
    pub result_ledger_cents: i64,
    /// Result held by in-flight or paid settlements.
    pub result_reserved_cents: i64,
    /// Withdrawable capital, never negative.
    pub available_capital_cents: i64,
    /// Withdrawable result, never negative.
    pub available_result_cents: i64,
    /// Pending capital redemptions awaiting review.
    pub pending_capital_cents: i64,
    /// Pending result settlements awaiting review.
    pub pending_result_cents: i64,
}

impl BalanceSnapshot {
    /// Available amount for the given withdrawal type.
    #[must_use]
    pub const fn available_for(&self, withdrawal_type: WithdrawalType) -> i64 {
        match withdrawal_type {
            WithdrawalType::CapitalRedemption => self.available_capital_cents,
            WithdrawalType::ResultSettlement => self.available_result_cents,
        }
    }
}
