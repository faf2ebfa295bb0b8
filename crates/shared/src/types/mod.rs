//! Common types used across the application.

pub mod money;
pub mod period;

pub use money::{format_quantity, quantity, round_cents};
pub use period::{MonthYear, PeriodError};
