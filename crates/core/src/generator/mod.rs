//! Report run orchestration.
//!
//! The generator walks account periods in order, decides which rows each one
//! needs, builds them, and hands them to a sink.

pub mod batch;
pub mod error;
pub mod replacement;
pub mod service;


pub use batch::{AccountPeriodInput, ReaccrualInput, ReportBatch};
pub use error::GenerateError;
pub use replacement::mark_meter_replacements;
pub use service::{ReportGenerator, RunSummary};
