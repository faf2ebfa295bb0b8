//! Per-account, per-period input facts.
//!
//! These are the values a report row is computed from: who the account is,
//! what was accrued, how hot water was metered, and which reaccruals happened.

pub mod types;

pub use types::{
    AccrualFact, AddressFact, MeteringFact, ReaccrualEvent, ReaccrualKind, UnknownReaccrualKind,
};
