//! Reaccrual decomposition.
//!
//! The ledger posts a hot-water reaccrual as one lump sum in the period it was
//! booked. The report wants it per corrected month, so the lump is spread back
//! over previous months' accruals.

pub mod decompose;


pub use decompose::{Decomposition, MAX_DEPTH, ReaccrualPart, decompose};
