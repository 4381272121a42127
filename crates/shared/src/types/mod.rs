//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{cents_to_decimal, decimal_to_cents};
pub use pagination::{PageMeta, PageRequest, PageResponse};
