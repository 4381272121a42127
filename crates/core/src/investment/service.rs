//! Investment validation and admin transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use vertice_shared::types::decimal_to_cents;

use super::error::InvestmentError;
use super::types::{InvestmentAction, InvestmentStatus};

/// Maximum length of an external payment reference.
pub const MAX_EXTERNAL_REF_LEN: usize = 80;

/// Stateless service for investment rules.
pub struct InvestmentService;

impl InvestmentService {
    /// Converts a deposit amount in currency units to cents.
    ///
    /// # Errors
    ///
    /// Returns `InvestmentError::Validation` if the amount is not positive
    /// after rounding to the cent, or does not fit in cents.
    pub fn parse_amount(amount: Decimal) -> Result<i64, InvestmentError> {
        let cents = decimal_to_cents(amount).ok_or_else(|| InvestmentError::Validation {
            field: "amount",
            message: "amount is too large".to_string(),
        })?;
        if cents <= 0 {
            return Err(InvestmentError::Validation {
                field: "amount",
                message: "amount must be greater than zero".to_string(),
            });
        }
        Ok(cents)
    }

    /// Approve a pending investment.
    ///
    /// Blank `external_ref` keeps the stored reference.
    pub fn approve(
        current_status: InvestmentStatus,
        approved_by: Uuid,
        paid_at: Option<DateTime<Utc>>,
        external_ref: Option<String>,
    ) -> Result<InvestmentAction, InvestmentError> {
        let external_ref = external_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if external_ref
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_EXTERNAL_REF_LEN)
        {
            return Err(InvestmentError::Validation {
                field: "external_ref",
                message: format!("must be at most {MAX_EXTERNAL_REF_LEN} characters"),
            });
        }

        match current_status {
            InvestmentStatus::Pending => Ok(InvestmentAction::Approve {
                new_status: InvestmentStatus::Approved,
                approved_by,
                paid_at,
                external_ref,
            }),
            _ => Err(InvestmentError::InvalidTransition {
                from: current_status,
                to: InvestmentStatus::Approved,
            }),
        }
    }

    /// Reject a pending investment.
    pub fn reject(
        current_status: InvestmentStatus,
        rejected_by: Uuid,
    ) -> Result<InvestmentAction, InvestmentError> {
        match current_status {
            InvestmentStatus::Pending => Ok(InvestmentAction::Reject {
                new_status: InvestmentStatus::Rejected,
                rejected_by,
            }),
            _ => Err(InvestmentError::InvalidTransition {
                from: current_status,
                to: InvestmentStatus::Rejected,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_rounds_to_cents() {
        assert_eq!(InvestmentService::parse_amount(dec!(500.005)).unwrap(), 50_001);
        assert_eq!(InvestmentService::parse_amount(dec!(1000)).unwrap(), 100_000);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-10))]
    #[case(dec!(0.004))]
    fn test_parse_amount_rejects_non_positive(#[case] amount: Decimal) {
        let err = InvestmentService::parse_amount(amount).unwrap_err();
        assert!(matches!(err, InvestmentError::Validation { field: "amount", .. }));
    }

    #[test]
    fn test_approve_from_pending() {
        let admin = Uuid::new_v4();
        let action = InvestmentService::approve(
            InvestmentStatus::Pending,
            admin,
            None,
            Some("  ".to_string()),
        )
        .unwrap();

        assert_eq!(action.new_status(), InvestmentStatus::Approved);
        if let InvestmentAction::Approve { external_ref, .. } = action {
            assert!(external_ref.is_none());
        } else {
            panic!("Expected Approve action");
        }
    }

    #[rstest]
    #[case(InvestmentStatus::Approved)]
    #[case(InvestmentStatus::Rejected)]
    fn test_no_reversal(#[case] status: InvestmentStatus) {
        assert!(matches!(
            InvestmentService::approve(status, Uuid::nil(), None, None),
            Err(InvestmentError::InvalidTransition { .. })
        ));
        assert!(matches!(
            InvestmentService::reject(status, Uuid::nil()),
            Err(InvestmentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reject_from_pending() {
        let action = InvestmentService::reject(InvestmentStatus::Pending, Uuid::nil()).unwrap();
        assert_eq!(action.new_status(), InvestmentStatus::Rejected);
    }

    #[test]
    fn test_external_ref_too_long() {
        let err = InvestmentService::approve(
            InvestmentStatus::Pending,
            Uuid::nil(),
            None,
            Some("x".repeat(81)),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
