//! `SeaORM` Entity for withdrawal_requests table.

use super::sea_orm_active_enums::{WithdrawalStatus, WithdrawalType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub withdrawal_type: WithdrawalType,
    pub amount_cents: i64,
    pub pix_key: String,
    pub scheduled_for: Option<Date>,
    pub status: WithdrawalStatus,
    pub rejection_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_note: Option<String>,
    pub external_ref: Option<String>,
    pub requested_at: DateTimeWithTimeZone,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub processed_by: Option<Uuid>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
