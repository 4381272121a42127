//! Core business logic for Vertice.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `balance` - Point-in-time withdrawal eligibility
//! - `withdrawal` - Withdrawal request lifecycle
//! - `investment` - Deposit review rules
//! - `ledger` - Manual result ledger adjustments
//! - `distribution` - Daily performance distribution rules
//! - `pix` - PIX BR Code encoding
//! - `notification` - In-app notification messages

pub mod balance;
pub mod distribution;
pub mod investment;
pub mod ledger;
pub mod notification;
pub mod pix;
pub mod withdrawal;
