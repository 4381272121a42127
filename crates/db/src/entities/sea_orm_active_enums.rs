//! Postgres enum types and their mapping to core types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use vertice_core::{investment, notification, withdrawal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "investment_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvestmentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalType {
    #[sea_orm(string_value = "CAPITAL_REDEMPTION")]
    CapitalRedemption,
    #[sea_orm(string_value = "RESULT_SETTLEMENT")]
    ResultSettlement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum WithdrawalStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_category")]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationCategory {
    #[sea_orm(string_value = "SYSTEM")]
    System,
    #[sea_orm(string_value = "INVESTMENT")]
    Investment,
    #[sea_orm(string_value = "WITHDRAWAL")]
    Withdrawal,
    #[sea_orm(string_value = "PERFORMANCE")]
    Performance,
}

impl From<InvestmentStatus> for investment::InvestmentStatus {
    fn from(status: InvestmentStatus) -> Self {
        match status {
            InvestmentStatus::Pending => Self::Pending,
            InvestmentStatus::Approved => Self::Approved,
            InvestmentStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<investment::InvestmentStatus> for InvestmentStatus {
    fn from(status: investment::InvestmentStatus) -> Self {
        match status {
            investment::InvestmentStatus::Pending => Self::Pending,
            investment::InvestmentStatus::Approved => Self::Approved,
            investment::InvestmentStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<WithdrawalType> for withdrawal::WithdrawalType {
    fn from(kind: WithdrawalType) -> Self {
        match kind {
            WithdrawalType::CapitalRedemption => Self::CapitalRedemption,
            WithdrawalType::ResultSettlement => Self::ResultSettlement,
        }
    }
}

impl From<withdrawal::WithdrawalType> for WithdrawalType {
    fn from(kind: withdrawal::WithdrawalType) -> Self {
        match kind {
            withdrawal::WithdrawalType::CapitalRedemption => Self::CapitalRedemption,
            withdrawal::WithdrawalType::ResultSettlement => Self::ResultSettlement,
        }
    }
}

impl From<WithdrawalStatus> for withdrawal::WithdrawalStatus {
    fn from(status: WithdrawalStatus) -> Self {
        match status {
            WithdrawalStatus::Pending => Self::Pending,
            WithdrawalStatus::Approved => Self::Approved,
            WithdrawalStatus::Rejected => Self::Rejected,
            WithdrawalStatus::Paid => Self::Paid,
        }
    }
}

impl From<withdrawal::WithdrawalStatus> for WithdrawalStatus {
    fn from(status: withdrawal::WithdrawalStatus) -> Self {
        match status {
            withdrawal::WithdrawalStatus::Pending => Self::Pending,
            withdrawal::WithdrawalStatus::Approved => Self::Approved,
            withdrawal::WithdrawalStatus::Rejected => Self::Rejected,
            withdrawal::WithdrawalStatus::Paid => Self::Paid,
        }
    }
}

impl From<notification::NotificationCategory> for NotificationCategory {
    fn from(category: notification::NotificationCategory) -> Self {
        match category {
            notification::NotificationCategory::System => Self::System,
            notification::NotificationCategory::Investment => Self::Investment,
            notification::NotificationCategory::Withdrawal => Self::Withdrawal,
            notification::NotificationCategory::Performance => Self::Performance,
        }
    }
}
