//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod balance;
pub mod distribution;
pub mod investment;
pub mod notification;
pub mod result_ledger;
pub mod user;
pub mod withdrawal;

pub use balance::BalanceRepository;
pub use distribution::{
    DistributionFilter, DistributionRepository, DistributionRunReport, OwnerFailure,
};
pub use investment::{CreateInvestmentInput, InvestmentFilter, InvestmentRepository};
pub use notification::{
    NotificationError, NotificationRepository, NotificationSink, deliver, deliver_to_admins,
};
pub use result_ledger::{ResultLedgerFilter, ResultLedgerRepository};
pub use user::UserRepository;
pub use withdrawal::{WithdrawalFilter, WithdrawalRepository, WithdrawalView};
