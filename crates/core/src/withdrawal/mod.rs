//! Withdrawal request lifecycle.
//!
//! # Modules
//!
//! - `types` - Withdrawal types, statuses and workflow actions
//! - `error` - Withdrawal-specific error types
//! - `service` - Validation, funds check and state transitions

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WithdrawalError;
pub use service::WithdrawalService;
pub use types::{
    ValidatedWithdrawal, WithdrawalAction, WithdrawalInput, WithdrawalStatus, WithdrawalType,
};
