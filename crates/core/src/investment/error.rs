//! Investment error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::InvestmentStatus;

/// Errors that can occur while handling investments.
#[derive(Debug, Error)]
pub enum InvestmentError {
    /// Input failed validation.
    #[error("{field}: {message}")]
    Validation {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: InvestmentStatus,
        /// The attempted target status.
        to: InvestmentStatus,
    },

    /// Investment not found.
    #[error("Investment {0} not found")]
    NotFound(Uuid),

    /// The depositing owner is not registered.
    #[error("User {0} not found")]
    OwnerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl InvestmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
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
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotFound(_) | Self::OwnerNotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
