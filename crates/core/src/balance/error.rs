//! Balance engine errors.

use thiserror::Error;

/// Errors raised while computing balances.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The ledger store could not be queried.
    #[error("Ledger store unavailable: {0}")]
    StoreUnavailable(String),
}

impl BalanceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::StoreUnavailable(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "DATABASE_ERROR",
        }
    }
}
