//! In-memory ledger records and the reference fold over them.
//!
//! The store's SUM queries apply these exact filters; keeping the fold here
//! lets the rules be tested without a database.

use chrono::{DateTime, NaiveDate, Utc};

use super::types::{BalanceAggregates, BalanceCutoffs};
use crate::investment::InvestmentStatus;
use crate::withdrawal::{WithdrawalStatus, WithdrawalType};

/// Fields of an investment relevant to balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentRecord {
    /// Deposit amount in cents.
    pub amount_cents: i64,
    /// Review status.
    pub status: InvestmentStatus,
    /// Settlement timestamp, when known.
    pub paid_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl InvestmentRecord {
    /// Instant from which the investment is recognized: `paid_at`, else `created_at`.
    #[must_use]
    pub fn recognized_at(&self) -> DateTime<Utc> {
        self.paid_at.unwrap_or(self.created_at)
    }

    fn counts_before(&self, bound: DateTime<Utc>) -> bool {
        self.status == InvestmentStatus::Approved && self.recognized_at() < bound
    }
}

/// Fields of a withdrawal request relevant to balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRecord {
    /// Balance drawn from.
    pub withdrawal_type: WithdrawalType,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Redemption date for capital requests.
    pub scheduled_for: Option<NaiveDate>,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
}

/// Fields of a result ledger entry relevant to balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultEntryRecord {
    /// Signed amount in cents.
    pub amount_cents: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

fn sum<I: IntoIterator<Item = i64>>(amounts: I) -> i64 {
    amounts.into_iter().fold(0i64, i64::saturating_add)
}

impl BalanceAggregates {
    /// Folds in-memory records with the same filters the store applies.
    #[must_use]
    pub fn from_records(
        cutoffs: &BalanceCutoffs,
        investments: &[InvestmentRecord],
        withdrawals: &[WithdrawalRecord],
        entries: &[ResultEntryRecord],
    ) -> Self {
        let reserving = |w: &&WithdrawalRecord, kind: WithdrawalType| {
            w.withdrawal_type == kind && w.status.reserves_funds()
        };
        let pending = |w: &&WithdrawalRecord, kind: WithdrawalType| {
            w.withdrawal_type == kind && w.status == WithdrawalStatus::Pending
        };

        Self {
            approved_capital_cents: sum(investments
                .iter()
                .filter(|i| i.counts_before(cutoffs.recognized_before))
                .map(|i| i.amount_cents)),
            liquid_capital_cents: sum(investments
                .iter()
                .filter(|i| i.counts_before(cutoffs.liquid_before))
                .map(|i| i.amount_cents)),
            capital_reserved_cents: sum(withdrawals
                .iter()
                .filter(|w| reserving(w, WithdrawalType::CapitalRedemption))
                .filter(|w| w.scheduled_for.is_none_or(|s| s <= cutoffs.reference_date))
                .map(|w| w.amount_cents)),
            result_ledger_cents: sum(entries
                .iter()
                .filter(|e| e.created_at < cutoffs.recognized_before)
                .map(|e| e.amount_cents)),
            result_reserved_cents: sum(withdrawals
                .iter()
                .filter(|w| reserving(w, WithdrawalType::ResultSettlement))
                .filter(|w| w.requested_at < cutoffs.recognized_before)
                .map(|w| w.amount_cents)),
            pending_capital_cents: sum(withdrawals
                .iter()
                .filter(|w| pending(w, WithdrawalType::CapitalRedemption))
                .map(|w| w.amount_cents)),
            pending_result_cents: sum(withdrawals
                .iter()
                .filter(|w| pending(w, WithdrawalType::ResultSettlement))
                .map(|w| w.amount_cents)),
        }
    }
}
