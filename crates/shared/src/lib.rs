//! Shared types, errors, and configuration for Heatbill.
//!
//! This crate provides common types used across all other crates:
//! - Billing period (`MonthYear`) with ordering and month arithmetic
//! - Decimal helpers for quantities and money amounts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
