//! Report rows and the rules that fill them.
//!
//! Every row is 47 positional cells. A builder starts from the identity
//! cells shared by all rows, then writes the chapters its row kind calls
//! for:
//! - `heating` - heating accrual rows
//! - `gvs` - hot-water accrual rows, single or split on meter replacement
//! - `gvs_reaccrual` - hot-water reaccrual rows
//!
//! Hot-water builders share an [`InstallDateMemo`] scoped to one run.

mod base;
pub mod error;
pub mod gvs;
pub mod gvs_reaccrual;
pub mod heating;
pub mod memo;
pub mod row;

#[cfg(test)]
mod tests;

pub use base::{GVS_LABEL, HEATING_LABEL, PAYMENT_DAY, RowContext};
pub use error::RowError;
pub use gvs::{gvs_closing_row, gvs_opening_row, gvs_row, gvs_rows, resolve_counter_number};
pub use gvs_reaccrual::gvs_reaccrual_row;
pub use heating::{HeatingRosters, heating_row};
pub use memo::{DEFAULT_INSTALL_DATE, InstallDateMemo};
pub use row::{Cell, FIELD_COUNT, RecordType, ReportRow, field};
