//! Distribution error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while distributing performance.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Input failed validation.
    #[error("{field}: {message}")]
    Validation {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },

    /// Amount arithmetic overflowed for one owner.
    #[error("Result for owner {0} does not fit in cents")]
    Overflow(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl DistributionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Overflow(_) => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Overflow(_) => "AMOUNT_OVERFLOW",
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
