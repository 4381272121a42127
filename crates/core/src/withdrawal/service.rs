//! Withdrawal validation, funds check and state transitions.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use vertice_shared::types::decimal_to_cents;

use crate::balance::BalanceSnapshot;
use crate::withdrawal::error::WithdrawalError;
use crate::withdrawal::types::{
    ValidatedWithdrawal, WithdrawalAction, WithdrawalInput, WithdrawalStatus, WithdrawalType,
};

/// Maximum length of a destination PIX key.
pub const MAX_PIX_KEY_LEN: usize = 140;
/// Maximum length of a rejection reason.
pub const MAX_REJECTION_REASON_LEN: usize = 255;
/// Maximum length of an external payment reference.
pub const MAX_EXTERNAL_REF_LEN: usize = 80;

/// Stateless service for the withdrawal lifecycle.
///
/// Transition methods return a `WithdrawalAction` carrying the audit data
/// the store must persist; they never touch storage themselves.
pub struct WithdrawalService;

impl WithdrawalService {
    /// Converts an amount in currency units to cents (half away from zero).
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::Validation` on field `amount` if the result
    /// is not strictly positive or overflows.
    pub fn parse_amount(amount: Decimal) -> Result<i64, WithdrawalError> {
        let cents = decimal_to_cents(amount)
            .ok_or_else(|| WithdrawalError::validation("amount", "amount is too large"))?;
        if cents <= 0 {
            return Err(WithdrawalError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }
        Ok(cents)
    }

    /// Validates client input and resolves the snapshot date.
    ///
    /// Capital redemptions need `scheduled_for` on or before `today` and are
    /// checked against the balance at `scheduled_for`; result settlements are
    /// checked at `today`.
    pub fn validate(
        input: WithdrawalInput,
        today: NaiveDate,
    ) -> Result<ValidatedWithdrawal, WithdrawalError> {
        if input.amount_cents <= 0 {
            return Err(WithdrawalError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }

        let pix_key = input.pix_key.trim().to_string();
        if pix_key.chars().count() > MAX_PIX_KEY_LEN {
            return Err(WithdrawalError::validation(
                "pix_key",
                format!("must be at most {MAX_PIX_KEY_LEN} characters"),
            ));
        }

        let reference_date = match input.withdrawal_type {
            WithdrawalType::CapitalRedemption => {
                let scheduled_for = input.scheduled_for.ok_or_else(|| {
                    WithdrawalError::validation(
                        "scheduled_for",
                        "scheduled_for is required for capital redemption",
                    )
                })?;
                if scheduled_for > today {
                    return Err(WithdrawalError::validation(
                        "scheduled_for",
                        format!("capital redemption allowed only up to today ({today})"),
                    ));
                }
                scheduled_for
            }
            WithdrawalType::ResultSettlement => today,
        };

        Ok(ValidatedWithdrawal {
            withdrawal_type: input.withdrawal_type,
            amount_cents: input.amount_cents,
            scheduled_for: input.scheduled_for,
            pix_key,
            reference_date,
        })
    }

    /// Checks the requested amount against the snapshot for its type.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::InsufficientFunds` carrying the available amount.
    pub fn check_funds(
        request: &ValidatedWithdrawal,
        snapshot: &BalanceSnapshot,
    ) -> Result<(), WithdrawalError> {
        Self::check_funds_through(request, snapshot, None)
    }

    /// Later date whose snapshot must also cover a capital redemption.
    ///
    /// `latest_reserved` is the latest `scheduled_for` among the owner's
    /// reserving capital requests. A redemption dated before it does not see
    /// those reservations in its own snapshot.
    #[must_use]
    pub fn admission_horizon(
        request: &ValidatedWithdrawal,
        latest_reserved: Option<NaiveDate>,
    ) -> Option<NaiveDate> {
        match request.withdrawal_type {
            WithdrawalType::CapitalRedemption => {
                latest_reserved.filter(|latest| *latest > request.reference_date)
            }
            WithdrawalType::ResultSettlement => None,
        }
    }

    /// Checks the requested amount against the reference snapshot and, when
    /// given, the snapshot at the admission horizon. The lower figure wins.
    ///
    /// # Errors
    ///
    /// Returns `WithdrawalError::InsufficientFunds` carrying the lower available amount.
    pub fn check_funds_through(
        request: &ValidatedWithdrawal,
        at_reference: &BalanceSnapshot,
        at_horizon: Option<&BalanceSnapshot>,
    ) -> Result<(), WithdrawalError> {
        let available_cents = at_horizon.map_or_else(
            || at_reference.available_for(request.withdrawal_type),
            |horizon| {
                at_reference
                    .available_for(request.withdrawal_type)
                    .min(horizon.available_for(request.withdrawal_type))
            },
        );
        if request.amount_cents > available_cents {
            return Err(WithdrawalError::InsufficientFunds {
                kind: request.withdrawal_type,
                requested_cents: request.amount_cents,
                available_cents,
            });
        }
        Ok(())
    }

    /// Reference date used to show availability next to a stored request.
    #[must_use]
    pub fn view_reference_date(scheduled_for: Option<NaiveDate>, today: NaiveDate) -> NaiveDate {
        scheduled_for.unwrap_or(today)
    }

    /// Approve a pending request.
    ///
    /// # Returns
    /// * `Ok(WithdrawalAction::Approve)` if the transition is valid
    /// * `Err(WithdrawalError::InvalidTransition)` if not in Pending status
    pub fn approve(
        current_status: WithdrawalStatus,
        approved_by: Uuid,
    ) -> Result<WithdrawalAction, WithdrawalError> {
        match current_status {
            WithdrawalStatus::Pending => Ok(WithdrawalAction::Approve {
                new_status: WithdrawalStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(WithdrawalError::InvalidTransition {
                from: current_status,
                to: WithdrawalStatus::Approved,
            }),
        }
    }

    /// Reject a pending or approved request, releasing its reservation.
    ///
    /// # Returns
    /// * `Err(WithdrawalError::Validation)` if the reason is blank or too long
    /// * `Err(WithdrawalError::InvalidTransition)` if already Paid or Rejected
    pub fn reject(
        current_status: WithdrawalStatus,
        rejected_by: Uuid,
        rejection_reason: &str,
        admin_note: Option<String>,
    ) -> Result<WithdrawalAction, WithdrawalError> {
        let rejection_reason = rejection_reason.trim();
        if rejection_reason.is_empty() {
            return Err(WithdrawalError::validation(
                "rejection_reason",
                "rejection_reason is required",
            ));
        }
        if rejection_reason.chars().count() > MAX_REJECTION_REASON_LEN {
            return Err(WithdrawalError::validation(
                "rejection_reason",
                format!("must be at most {MAX_REJECTION_REASON_LEN} characters"),
            ));
        }

        match current_status {
            WithdrawalStatus::Pending | WithdrawalStatus::Approved => {
                Ok(WithdrawalAction::Reject {
                    new_status: WithdrawalStatus::Rejected,
                    rejected_by,
                    rejection_reason: rejection_reason.to_string(),
                    admin_note: non_blank(admin_note),
                })
            }
            WithdrawalStatus::Rejected | WithdrawalStatus::Paid => {
                Err(WithdrawalError::InvalidTransition {
                    from: current_status,
                    to: WithdrawalStatus::Rejected,
                })
            }
        }
    }

    /// Mark an approved request as paid.
    ///
    /// Blank `external_ref` or `admin_note` keep the stored values.
    pub fn pay(
        current_status: WithdrawalStatus,
        paid_by: Uuid,
        external_ref: Option<String>,
        admin_note: Option<String>,
    ) -> Result<WithdrawalAction, WithdrawalError> {
        let external_ref = non_blank(external_ref);
        if external_ref
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_EXTERNAL_REF_LEN)
        {
            return Err(WithdrawalError::validation(
                "external_ref",
                format!("must be at most {MAX_EXTERNAL_REF_LEN} characters"),
            ));
        }

        match current_status {
            WithdrawalStatus::Approved => Ok(WithdrawalAction::Pay {
                new_status: WithdrawalStatus::Paid,
                paid_by,
                paid_at: Utc::now(),
                external_ref,
                admin_note: non_blank(admin_note),
            }),
            _ => Err(WithdrawalError::InvalidTransition {
                from: current_status,
                to: WithdrawalStatus::Paid,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Approved → Paid (pay)
    /// - Pending | Approved → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: WithdrawalStatus, to: WithdrawalStatus) -> bool {
        matches!(
            (from, to),
            (WithdrawalStatus::Pending, WithdrawalStatus::Approved)
                | (WithdrawalStatus::Approved, WithdrawalStatus::Paid)
                | (
                    WithdrawalStatus::Pending | WithdrawalStatus::Approved,
                    WithdrawalStatus::Rejected
                )
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
