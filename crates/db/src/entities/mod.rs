//! `SeaORM` entity definitions.

pub mod prelude;

pub mod daily_performance_distributions;
pub mod investments;
pub mod notifications;
pub mod result_ledger_entries;
pub mod sea_orm_active_enums;
pub mod users;
pub mod withdrawal_requests;
