//! Daily performance distribution.
//!
//! A run applies a percentage to each owner's recognized capital for a
//! business date. Results accumulate on one row per (owner, date) and are
//! mirrored into the result ledger as one entry per run.
//!
//! # Modules
//!
//! - `percent` - Percentage application and validation
//! - `processor` - Run planning, per-owner outcome and additive merge
//! - `error` - Distribution-specific error types

pub mod error;
pub mod percent;
pub mod processor;

#[cfg(test)]
mod props;

pub use error::DistributionError;
pub use percent::{apply_percent, validate_percent};
pub use processor::{
    DistributionPlan, DistributionProcessor, DistributionRequest, DistributionSummary,
    DistributionUpdate, OwnerOutcome,
};
