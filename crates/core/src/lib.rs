//! Core billing report logic for Heatbill.
//!
//! This crate turns per-account billing facts into the rows of a fixed
//! 47-column heating and hot-water report. It has no spreadsheet or database
//! dependencies; data sources are reached through collaborator traits.
//!
//! # Modules
//!
//! - `facts` - Input facts per account and period
//! - `tariff` - Heat energy prices per period
//! - `roster` - Yearly building lists
//! - `ledger` - Account ledger lookups
//! - `reaccrual` - Spreading lump reaccruals over corrected months
//! - `report` - Row layout and row builders
//! - `sink` - Report persistence
//! - `generator` - Report run orchestration

pub mod facts;
pub mod generator;
pub mod ledger;
pub mod reaccrual;
pub mod report;
pub mod roster;
pub mod sink;
pub mod tariff;
