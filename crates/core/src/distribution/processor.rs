//! Per-owner rules of a performance distribution run.
//!
//! The store drives the batch: it lists owners with recognized capital,
//! asks [`DistributionProcessor::evaluate`] what to do for each, and
//! persists the merged row plus one ledger entry per (owner, tag, run).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DistributionError;
use super::percent::{apply_percent, validate_percent};
use crate::balance::BalanceSnapshot;

/// Maximum length of a distribution note.
pub const MAX_NOTE_LEN: usize = 255;

/// Admin input for one distribution run.
#[derive(Debug, Clone)]
pub struct DistributionRequest {
    /// Business date being distributed; defaults to today.
    pub reference_date: Option<NaiveDate>,
    /// Daily performance in percent, e.g. `1.2500`.
    pub performance_percent: Decimal,
    /// Restrict the run to a single owner.
    pub owner: Option<Uuid>,
    /// Free-text note stored on each distribution row.
    pub note: Option<String>,
    /// Batch identifier; a replay with the same id is skipped per owner.
    pub run_id: Option<Uuid>,
}

/// A validated run, ready to be applied owner by owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionPlan {
    /// Business date being distributed.
    pub reference_date: NaiveDate,
    /// Daily performance in percent.
    pub performance_percent: Decimal,
    /// Restrict the run to a single owner.
    pub owner: Option<Uuid>,
    /// Note stored on each distribution row.
    pub note: String,
    /// Batch identifier.
    pub run_id: Uuid,
    /// Ledger `external_ref` shared by all entries for the date.
    pub ledger_tag: String,
}

/// What a run does for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerOutcome {
    /// Credit (or debit, for a negative percentage) the owner.
    Apply {
        /// Capital the percentage is applied to.
        base_capital_cents: i64,
        /// Signed result for this run.
        result_cents: i64,
    },
    /// Nothing to distribute: no capital left after reservations.
    SkipNoBase,
    /// The percentage rounds to zero cents on this base.
    SkipZeroResult,
}

/// Values to write to the (owner, date) distribution row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionUpdate {
    /// Percentage of the latest run.
    pub performance_percent: Decimal,
    /// Base of the latest run.
    pub base_capital_cents: i64,
    /// Accumulated result across runs for the date.
    pub result_cents: i64,
    /// Note of the latest run.
    pub note: String,
}

/// Totals reported back to the admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Owners credited in this run.
    pub owners_processed: u32,
    /// Owners skipped for zero base or zero result.
    pub owners_skipped: u32,
    /// Owners already applied under the same run id.
    pub owners_replayed: u32,
    /// Sum of results written in this run.
    pub total_result_cents: i64,
}

impl DistributionSummary {
    /// Records an applied owner.
    pub fn record_applied(&mut self, result_cents: i64) {
        self.owners_processed += 1;
        self.total_result_cents = self.total_result_cents.saturating_add(result_cents);
    }

    /// Records a skipped owner.
    pub fn record_skipped(&mut self) {
        self.owners_skipped += 1;
    }

    /// Records an owner already covered by this run id.
    pub fn record_replayed(&mut self) {
        self.owners_replayed += 1;
    }
}

/// Stateless rules for performance distribution.
pub struct DistributionProcessor;

impl DistributionProcessor {
    /// Validates a request and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::Validation` if the date is in the future,
    /// the percentage does not fit NUMERIC(7,4), or the note is too long.
    pub fn plan(
        request: DistributionRequest,
        today: NaiveDate,
    ) -> Result<DistributionPlan, DistributionError> {
        let reference_date = request.reference_date.unwrap_or(today);
        if reference_date > today {
            return Err(DistributionError::validation(
                "reference_date",
                "reference_date cannot be in the future",
            ));
        }

        let performance_percent = validate_percent(request.performance_percent)?;

        let note = request.note.map(|n| n.trim().to_string()).unwrap_or_default();
        if note.chars().count() > MAX_NOTE_LEN {
            return Err(DistributionError::validation(
                "note",
                format!("must be at most {MAX_NOTE_LEN} characters"),
            ));
        }

        Ok(DistributionPlan {
            reference_date,
            performance_percent,
            owner: request.owner,
            note,
            run_id: request.run_id.unwrap_or_else(Uuid::now_v7),
            ledger_tag: Self::ledger_tag(reference_date),
        })
    }

    /// Ledger `external_ref` for a distribution date.
    #[must_use]
    pub fn ledger_tag(reference_date: NaiveDate) -> String {
        format!("perf-{}", reference_date.format("%Y-%m-%d"))
    }

    /// Ledger description for a distribution date.
    #[must_use]
    pub fn ledger_description(reference_date: NaiveDate) -> String {
        format!(
            "Daily performance distribution {}",
            reference_date.format("%Y-%m-%d")
        )
    }

    /// Capital a distribution applies to: recognized approved capital minus
    /// capital reserved for redemption, both as of D.
    #[must_use]
    pub const fn base_capital(snapshot: &BalanceSnapshot) -> i64 {
        snapshot
            .approved_capital_cents
            .saturating_sub(snapshot.capital_reserved_cents)
    }

    /// Decides what a run does for one owner.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::Overflow` if the result does not fit in cents.
    pub fn evaluate(
        owner: Uuid,
        base_capital_cents: i64,
        performance_percent: Decimal,
    ) -> Result<OwnerOutcome, DistributionError> {
        if base_capital_cents <= 0 {
            return Ok(OwnerOutcome::SkipNoBase);
        }
        let result_cents = apply_percent(base_capital_cents, performance_percent)
            .ok_or(DistributionError::Overflow(owner))?;
        if result_cents == 0 {
            return Ok(OwnerOutcome::SkipZeroResult);
        }
        Ok(OwnerOutcome::Apply {
            base_capital_cents,
            result_cents,
        })
    }

    /// Additive merge into the (owner, date) row.
    ///
    /// The stored result accumulates; percentage, base and note are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError::Overflow` if the accumulated result overflows.
    pub fn merge(
        owner: Uuid,
        existing_result_cents: Option<i64>,
        plan: &DistributionPlan,
        base_capital_cents: i64,
        result_cents: i64,
    ) -> Result<DistributionUpdate, DistributionError> {
        let accumulated = existing_result_cents
            .unwrap_or(0)
            .checked_add(result_cents)
            .ok_or(DistributionError::Overflow(owner))?;
        Ok(DistributionUpdate {
            performance_percent: plan.performance_percent,
            base_capital_cents,
            result_cents: accumulated,
            note: plan.note.clone(),
        })
    }
}
