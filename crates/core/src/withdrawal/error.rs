//! Withdrawal error types.

use thiserror::Error;
use uuid::Uuid;

use crate::withdrawal::types::{WithdrawalStatus, WithdrawalType};

/// Errors that can occur during withdrawal operations.
#[derive(Debug, Error)]
pub enum WithdrawalError {
    /// Input failed validation.
    #[error("{field}: {message}")]
    Validation {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },

    /// Requested amount exceeds what the balance engine allows.
    #[error(
        "Insufficient {} balance: requested {requested_cents} cents, available {available_cents} cents",
        balance_label(.kind)
    )]
    InsufficientFunds {
        /// Which balance was checked.
        kind: WithdrawalType,
        /// Requested amount.
        requested_cents: i64,
        /// Amount available at the reference date.
        available_cents: i64,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: WithdrawalStatus,
        /// The attempted target status.
        to: WithdrawalStatus,
    },

    /// Withdrawal request not found.
    #[error("Withdrawal request {0} not found")]
    NotFound(Uuid),

    /// The requesting owner is not registered.
    #[error("User {0} not found")]
    OwnerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

const fn balance_label(kind: &WithdrawalType) -> &'static str {
    match kind {
        WithdrawalType::CapitalRedemption => "capital",
        WithdrawalType::ResultSettlement => "result",
    }
}

impl WithdrawalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::InsufficientFunds { .. } => 422,
            Self::InvalidTransition { .. } => 409,
            Self::NotFound(_) | Self::OwnerNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) | Self::OwnerNotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
