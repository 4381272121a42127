//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investments::Entity")]
    Investments,
    #[sea_orm(has_many = "super::withdrawal_requests::Entity")]
    WithdrawalRequests,
    #[sea_orm(has_many = "super::result_ledger_entries::Entity")]
    ResultLedgerEntries,
    #[sea_orm(has_many = "super::daily_performance_distributions::Entity")]
    DailyPerformanceDistributions,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl Related<super::withdrawal_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalRequests.def()
    }
}

impl Related<super::result_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ResultLedgerEntries.def()
    }
}

impl Related<super::daily_performance_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyPerformanceDistributions.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
