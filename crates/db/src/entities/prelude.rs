//! Entity re-exports.

pub use super::daily_performance_distributions::Entity as DailyPerformanceDistributions;
pub use super::investments::Entity as Investments;
pub use super::notifications::Entity as Notifications;
pub use super::result_ledger_entries::Entity as ResultLedgerEntries;
pub use super::users::Entity as Users;
pub use super::withdrawal_requests::Entity as WithdrawalRequests;
