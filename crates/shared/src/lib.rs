//! Shared types, errors, and configuration for Vertice.
//!
//! This crate provides common types used across all other crates:
//! - Cent-denominated money helpers
//! - Pagination types for list endpoints
//! - Access errors shared by the API layer
//! - Configuration management
//! - JWT claims issued by the identity provider

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, BalanceConfig, JwtConfig, PixConfig};
pub use error::AppError;
pub use jwt::{JwtError, JwtService};
