//! In-app notification messages.
//!
//! Builders here only compose text and payload; delivery lives in the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use uuid::Uuid;

use crate::withdrawal::WithdrawalType;
use vertice_shared::types::cents_to_decimal;

/// Maximum title length.
pub const MAX_TITLE_LEN: usize = 120;
/// Maximum message length.
pub const MAX_MESSAGE_LEN: usize = 255;

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationCategory {
    /// General system messages.
    System,
    /// Deposit lifecycle.
    Investment,
    /// Withdrawal lifecycle.
    Withdrawal,
    /// Performance distributions.
    Performance,
}

impl NotificationCategory {
    /// Returns the string representation of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Investment => "INVESTMENT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Performance => "PERFORMANCE",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message ready to be delivered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationMessage {
    /// Category.
    pub category: NotificationCategory,
    /// Short title, at most 120 characters.
    pub title: String,
    /// Body, at most 255 characters.
    pub message: String,
    /// Structured context for clients.
    pub payload: Value,
}

impl NotificationMessage {
    /// Builds a message, truncating title and body to their limits.
    #[must_use]
    pub fn new(
        category: NotificationCategory,
        title: impl AsRef<str>,
        message: impl AsRef<str>,
        payload: Value,
    ) -> Self {
        Self {
            category,
            title: truncate(title.as_ref(), MAX_TITLE_LEN),
            message: truncate(message.as_ref(), MAX_MESSAGE_LEN),
            payload,
        }
    }

    /// A new withdrawal request, addressed to admins.
    #[must_use]
    pub fn withdrawal_requested(
        withdrawal_id: Uuid,
        owner: Uuid,
        withdrawal_type: WithdrawalType,
        amount_cents: i64,
    ) -> Self {
        Self::new(
            NotificationCategory::Withdrawal,
            "New withdrawal request",
            format!(
                "{} request of R$ {} awaiting review.",
                type_label(withdrawal_type),
                cents_to_decimal(amount_cents)
            ),
            json!({
                "withdrawal_id": withdrawal_id,
                "user_id": owner,
                "withdrawal_type": withdrawal_type,
                "amount_cents": amount_cents,
            }),
        )
    }

    /// The owner's request was approved.
    #[must_use]
    pub fn withdrawal_approved(withdrawal_id: Uuid, amount_cents: i64) -> Self {
        Self::new(
            NotificationCategory::Withdrawal,
            "Withdrawal approved",
            format!(
                "Your withdrawal of R$ {} was approved and will be paid soon.",
                cents_to_decimal(amount_cents)
            ),
            json!({ "withdrawal_id": withdrawal_id, "status": "APPROVED" }),
        )
    }

    /// The owner's request was rejected.
    #[must_use]
    pub fn withdrawal_rejected(withdrawal_id: Uuid, amount_cents: i64, reason: &str) -> Self {
        Self::new(
            NotificationCategory::Withdrawal,
            "Withdrawal rejected",
            format!(
                "Your withdrawal of R$ {} was rejected: {reason}",
                cents_to_decimal(amount_cents)
            ),
            json!({
                "withdrawal_id": withdrawal_id,
                "status": "REJECTED",
                "rejection_reason": reason,
            }),
        )
    }

    /// The owner's request was paid.
    #[must_use]
    pub fn withdrawal_paid(
        withdrawal_id: Uuid,
        amount_cents: i64,
        external_ref: Option<&str>,
    ) -> Self {
        Self::new(
            NotificationCategory::Withdrawal,
            "Withdrawal paid",
            format!(
                "Your withdrawal of R$ {} was paid.",
                cents_to_decimal(amount_cents)
            ),
            json!({
                "withdrawal_id": withdrawal_id,
                "status": "PAID",
                "external_ref": external_ref,
            }),
        )
    }

    /// A new deposit, addressed to admins.
    #[must_use]
    pub fn investment_created(investment_id: Uuid, owner: Uuid, amount_cents: i64) -> Self {
        Self::new(
            NotificationCategory::Investment,
            "New investment",
            format!(
                "Deposit of R$ {} awaiting confirmation.",
                cents_to_decimal(amount_cents)
            ),
            json!({
                "investment_id": investment_id,
                "user_id": owner,
                "amount_cents": amount_cents,
            }),
        )
    }

    /// The owner's deposit was reviewed.
    #[must_use]
    pub fn investment_reviewed(investment_id: Uuid, amount_cents: i64, approved: bool) -> Self {
        let (title, verb, status) = if approved {
            ("Investment approved", "confirmed", "APPROVED")
        } else {
            ("Investment rejected", "rejected", "REJECTED")
        };
        Self::new(
            NotificationCategory::Investment,
            title,
            format!(
                "Your deposit of R$ {} was {verb}.",
                cents_to_decimal(amount_cents)
            ),
            json!({ "investment_id": investment_id, "status": status }),
        )
    }

    /// A distribution run touched the owner's result.
    #[must_use]
    pub fn performance_distributed(
        reference_date: NaiveDate,
        result_cents: i64,
        performance_percent: rust_decimal::Decimal,
    ) -> Self {
        Self::new(
            NotificationCategory::Performance,
            format!("Performance for {reference_date}"),
            format!(
                "R$ {} ({performance_percent}%) was added to your results.",
                cents_to_decimal(result_cents)
            ),
            json!({
                "reference_date": reference_date,
                "result_cents": result_cents,
                "performance_percent": performance_percent,
            }),
        )
    }
}

const fn type_label(withdrawal_type: WithdrawalType) -> &'static str {
    match withdrawal_type {
        WithdrawalType::CapitalRedemption => "Capital redemption",
        WithdrawalType::ResultSettlement => "Result settlement",
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
