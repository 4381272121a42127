//! Investment domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Investment status.
///
/// Only `Approved` investments count toward capital. Transitions are
/// Pending → Approved and Pending → Rejected, with no reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvestmentStatus {
    /// Deposit announced, awaiting confirmation.
    Pending,
    /// Deposit confirmed.
    Approved,
    /// Deposit refused.
    Rejected,
}

impl InvestmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an admin decision on a pending investment.
#[derive(Debug, Clone)]
pub enum InvestmentAction {
    /// Confirm the deposit.
    Approve {
        /// The new status after approval.
        new_status: InvestmentStatus,
        /// The admin who approved.
        approved_by: Uuid,
        /// Settlement timestamp; `None` keeps the stored value.
        paid_at: Option<DateTime<Utc>>,
        /// Payment reference; `None` keeps the stored value.
        external_ref: Option<String>,
    },
    /// Refuse the deposit.
    Reject {
        /// The new status after rejection.
        new_status: InvestmentStatus,
        /// The admin who rejected.
        rejected_by: Uuid,
    },
}

impl InvestmentAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> InvestmentStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}
