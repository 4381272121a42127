//! Withdrawal domain types.
//!
//! A withdrawal request moves through:
//! - Pending → Approved (approve)
//! - Approved → Paid (pay)
//! - Pending | Approved → Rejected (reject)
//!
//! Paid and Rejected are terminal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which balance a withdrawal draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalType {
    /// Redeem matured principal.
    CapitalRedemption,
    /// Settle accrued performance results.
    ResultSettlement,
}

impl WithdrawalType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CapitalRedemption => "CAPITAL_REDEMPTION",
            Self::ResultSettlement => "RESULT_SETTLEMENT",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CAPITAL_REDEMPTION" => Some(Self::CapitalRedemption),
            "RESULT_SETTLEMENT" => Some(Self::ResultSettlement),
            _ => None,
        }
    }
}

impl fmt::Display for WithdrawalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Withdrawal request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WithdrawalStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved, awaiting payout.
    Approved,
    /// Declined by an admin (terminal).
    Rejected,
    /// Paid out (terminal).
    Paid,
}

impl WithdrawalStatus {
    /// Statuses whose amount is held against the balance.
    pub const RESERVING: [Self; 3] = [Self::Pending, Self::Approved, Self::Paid];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "PAID" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Returns true if a request in this status reserves funds.
    #[must_use]
    pub const fn reserves_funds(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Paid)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client input for a new withdrawal request.
#[derive(Debug, Clone)]
pub struct WithdrawalInput {
    /// Balance to draw from.
    pub withdrawal_type: WithdrawalType,
    /// Requested amount in cents.
    pub amount_cents: i64,
    /// Redemption date; mandatory for capital redemptions.
    pub scheduled_for: Option<NaiveDate>,
    /// Destination PIX key.
    pub pix_key: String,
}

/// A request that passed field validation and is ready for the funds check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWithdrawal {
    /// Balance to draw from.
    pub withdrawal_type: WithdrawalType,
    /// Requested amount in cents.
    pub amount_cents: i64,
    /// Redemption date as submitted.
    pub scheduled_for: Option<NaiveDate>,
    /// Destination PIX key, trimmed.
    pub pix_key: String,
    /// Date at which the balance snapshot must be taken.
    pub reference_date: NaiveDate,
}

/// Workflow action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum WithdrawalAction {
    /// Approve a pending request.
    Approve {
        /// The new status after approval.
        new_status: WithdrawalStatus,
        /// The admin who approved the request.
        approved_by: Uuid,
        /// When the request was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending or approved request.
    Reject {
        /// The new status after rejection.
        new_status: WithdrawalStatus,
        /// The admin who rejected the request.
        rejected_by: Uuid,
        /// The reason for rejection.
        rejection_reason: String,
        /// Replacement admin note; `None` keeps the stored note.
        admin_note: Option<String>,
    },
    /// Mark an approved request as paid.
    Pay {
        /// The new status after payout.
        new_status: WithdrawalStatus,
        /// The admin who recorded the payout.
        paid_by: Uuid,
        /// When the payout was recorded.
        paid_at: DateTime<Utc>,
        /// Replacement payment reference; `None` keeps the stored one.
        external_ref: Option<String>,
        /// Replacement admin note; `None` keeps the stored note.
        admin_note: Option<String>,
    },
}

impl WithdrawalAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> WithdrawalStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Pay { new_status, .. } => *new_status,
        }
    }

    /// Returns the admin performing the action.
    #[must_use]
    pub const fn actor(&self) -> Uuid {
        match self {
            Self::Approve { approved_by, .. } => *approved_by,
            Self::Reject { rejected_by, .. } => *rejected_by,
            Self::Pay { paid_by, .. } => *paid_by,
        }
    }
}
