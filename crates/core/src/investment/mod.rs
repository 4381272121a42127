//! Capital deposits ("investments") and their admin review.

pub mod error;
pub mod service;
pub mod types;

pub use error::InvestmentError;
pub use service::InvestmentService;
pub use types::{InvestmentAction, InvestmentStatus};
