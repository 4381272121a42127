//! Balance and eligibility engine.
//!
//! Answers, for an owner and a reference date D, how much capital and how
//! much accrued result may be withdrawn.
//!
//! # Modules
//!
//! - `calendar` - Business-date boundaries in the configured time zone
//! - `types` - Policy, cutoffs, aggregates and snapshots
//! - `records` - In-memory records and the reference fold
//! - `engine` - Available-balance derivation
//! - `error` - Store failures

pub mod calendar;
pub mod engine;
pub mod error;
pub mod records;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use calendar::BusinessCalendar;
pub use engine::BalanceEngine;
pub use error::BalanceError;
pub use records::{InvestmentRecord, ResultEntryRecord, WithdrawalRecord};
pub use types::{
    BalanceAggregates, BalanceCutoffs, BalancePolicy, BalanceSnapshot,
    DEFAULT_MATURITY_WINDOW_DAYS,
};
