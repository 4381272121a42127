//! Manual result ledger adjustments.
//!
//! Ledger entries are immutable; a correction is a new entry with the
//! opposite direction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use vertice_shared::types::decimal_to_cents;

/// Maximum length of an entry description.
pub const MAX_DESCRIPTION_LEN: usize = 255;
/// Maximum length of an entry external reference.
pub const MAX_EXTERNAL_REF_LEN: usize = 80;

/// Direction of a manual entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryDirection {
    /// Adds to the owner's result.
    Credit,
    /// Subtracts from the owner's result.
    Debit,
}

/// Admin input for a manual entry.
#[derive(Debug, Clone)]
pub struct ManualEntryInput {
    /// Credit or debit.
    pub direction: EntryDirection,
    /// Unsigned amount in currency units.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Optional external reference.
    pub external_ref: Option<String>,
}

/// A manual entry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    /// Signed amount in cents, never zero.
    pub amount_cents: i64,
    /// Trimmed description.
    pub description: String,
    /// Trimmed reference, empty when absent.
    pub external_ref: String,
}

/// Errors raised by result ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed validation.
    #[error("{field}: {message}")]
    Validation {
        /// Offending field.
        field: &'static str,
        /// Human readable reason.
        message: String,
    },

    /// The ledger owner is not registered.
    #[error("User {0} not found")]
    OwnerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::OwnerNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::OwnerNotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Stateless rules for manual ledger entries.
pub struct LedgerService;

impl LedgerService {
    /// Validates a manual entry and signs its amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the amount is not positive after
    /// rounding to the cent, or a text field is blank or too long.
    pub fn manual_entry(input: ManualEntryInput) -> Result<ManualEntry, LedgerError> {
        let cents = decimal_to_cents(input.amount)
            .ok_or_else(|| LedgerError::validation("amount", "amount is too large"))?;
        if cents <= 0 {
            return Err(LedgerError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }

        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::validation(
                "description",
                "description is required",
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(LedgerError::validation(
                "description",
                format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
            ));
        }

        let external_ref = input
            .external_ref
            .map(|r| r.trim().to_string())
            .unwrap_or_default();
        if external_ref.chars().count() > MAX_EXTERNAL_REF_LEN {
            return Err(LedgerError::validation(
                "external_ref",
                format!("must be at most {MAX_EXTERNAL_REF_LEN} characters"),
            ));
        }
        // Distribution runs own this prefix.
        if external_ref.starts_with("perf-") {
            return Err(LedgerError::validation(
                "external_ref",
                "the perf- prefix is reserved for distributions",
            ));
        }

        let amount_cents = match input.direction {
            EntryDirection::Credit => cents,
            EntryDirection::Debit => -cents,
        };

        Ok(ManualEntry {
            amount_cents,
            description,
            external_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input(direction: EntryDirection, amount: Decimal) -> ManualEntryInput {
        ManualEntryInput {
            direction,
            amount,
            description: " bonus ".to_string(),
            external_ref: None,
        }
    }

    #[rstest]
    #[case(EntryDirection::Credit, dec!(10.50), 1_050)]
    #[case(EntryDirection::Debit, dec!(10.50), -1_050)]
    #[case(EntryDirection::Debit, dec!(0.005), -1)]
    fn test_manual_entry_signs_amount(
        #[case] direction: EntryDirection,
        #[case] amount: Decimal,
        #[case] expected: i64,
    ) {
        let entry = LedgerService::manual_entry(input(direction, amount)).unwrap();
        assert_eq!(entry.amount_cents, expected);
        assert_eq!(entry.description, "bonus");
        assert_eq!(entry.external_ref, "");
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(0.004))]
    #[case(dec!(-5))]
    fn test_manual_entry_rejects_non_positive(#[case] amount: Decimal) {
        let err = LedgerService::manual_entry(input(EntryDirection::Credit, amount)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_manual_entry_requires_description() {
        let mut req = input(EntryDirection::Credit, dec!(1));
        req.description = "   ".to_string();
        assert!(matches!(
            LedgerService::manual_entry(req),
            Err(LedgerError::Validation { field: "description", .. })
        ));
    }

    #[test]
    fn test_manual_entry_reserves_perf_prefix() {
        let mut req = input(EntryDirection::Credit, dec!(1));
        req.external_ref = Some("perf-2026-06-01".to_string());
        assert!(matches!(
            LedgerService::manual_entry(req),
            Err(LedgerError::Validation { field: "external_ref", .. })
        ));
    }

    #[test]
    fn test_direction_wire_names() {
        let dir: EntryDirection = serde_json::from_str("\"DEBIT\"").unwrap();
        assert_eq!(dir, EntryDirection::Debit);
    }
}
