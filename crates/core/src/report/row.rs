//! The fixed 47-column report row.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of columns in every report row.
pub const FIELD_COUNT: usize = 47;

/// Column indices, zero-based.
pub mod field {
    /// Report month.
    pub const REPORT_MONTH: usize = 0;
    /// Report year.
    pub const REPORT_YEAR: usize = 1;
    /// Personal account.
    pub const ACCOUNT: usize = 2;
    /// Address.
    pub const ADDRESS: usize = 3;
    /// Record type code.
    pub const RECORD_TYPE: usize = 4;
    /// Service label.
    pub const SERVICE: usize = 5;
    /// Accrual month (the corrected month for reaccruals).
    pub const ACCRUAL_MONTH: usize = 6;
    /// Accrual year (the corrected year for reaccruals).
    pub const ACCRUAL_YEAR: usize = 7;
    /// Tariff price.
    pub const PRICE: usize = 8;
    /// Meter category.
    pub const METER_CATEGORY: usize = 9;
    /// Meter install date.
    pub const METER_INSTALLED: usize = 10;
    /// Meter location.
    pub const METER_LOCATION: usize = 11;
    /// Meter configuration constant.
    pub const METER_CHANNELS: usize = 12;
    /// Meter model.
    pub const METER_MODEL: usize = 13;
    /// Meter serial number.
    pub const METER_NUMBER: usize = 14;
    /// Meter configuration constant.
    pub const METER_DIGITS: usize = 15;
    /// Meter configuration constant.
    pub const METER_PRECISION: usize = 16;
    /// Date of the last reading.
    pub const READING_DATE: usize = 19;
    /// Where the reading came from.
    pub const READING_SOURCE: usize = 20;
    /// Reading value.
    pub const READING: usize = 21;
    /// Consumption derived from the meter.
    pub const METER_CONSUMPTION: usize = 22;
    /// Meter-based chapter: quantity.
    pub const METER_QUANTITY: usize = 23;
    /// Meter-based chapter: sum.
    pub const METER_SUM: usize = 24;
    /// Meter-based chapter: sum, repeated.
    pub const METER_SUM_DUP: usize = 25;
    /// Average-based chapter: quantity.
    pub const AVERAGE_QUANTITY: usize = 26;
    /// Average-based chapter: sum.
    pub const AVERAGE_SUM: usize = 27;
    /// Average-based chapter: sum, repeated.
    pub const AVERAGE_SUM_DUP: usize = 28;
    /// Registered residents.
    pub const POPULATION: usize = 30;
    /// Normative chapter: quantity.
    pub const NORM_QUANTITY: usize = 31;
    /// Normative chapter: sum.
    pub const NORM_SUM: usize = 32;
    /// Normative chapter: sum, repeated.
    pub const NORM_SUM_DUP: usize = 33;
    /// Consolidated chapter: quantity.
    pub const TOTAL_QUANTITY: usize = 35;
    /// Consolidated chapter: amount.
    pub const TOTAL_SUM: usize = 36;
    /// Consolidated chapter: amount, repeated.
    pub const TOTAL_SUM_DUP: usize = 37;
    /// Payment period start.
    pub const PAYMENT_FROM: usize = 40;
    /// Payment period end.
    pub const PAYMENT_TO: usize = 41;
    /// Payment amount.
    pub const PAYMENT: usize = 42;
    /// Payment type.
    pub const PAYMENT_KIND: usize = 43;
    /// Closing balance.
    pub const CLOSING_BALANCE: usize = 45;
}

/// Kind of report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordType {
    /// Heating accrual.
    HeatingAccural,
    /// Heating reaccrual. Reserved, never produced.
    HeatingReaccural,
    /// Hot-water accrual.
    GvsAccural,
    /// Hot-water reaccrual.
    GvsReaccural,
}

impl RecordType {
    /// Code written to the record type column.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::HeatingAccural => "HEATING_ACCURAL",
            Self::HeatingReaccural => "HEATING_REACCURAL",
            Self::GvsAccural => "GVS_ACCURAL",
            Self::GvsReaccural => "GVS_REACCURAL",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One report cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cell {
    /// Nothing written.
    #[default]
    Empty,
    /// Whole number.
    Int(i64),
    /// Text, including pre-formatted quantities and dates.
    Text(String),
    /// Money amount or reading.
    Amount(Decimal),
}

impl Cell {
    /// True for [`Cell::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Text content, if this is a text cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Decimal content, if this is an amount cell.
    #[must_use]
    pub const fn as_amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Amount(amount) => write!(f, "{amount}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// A finished report row. Exactly [`FIELD_COUNT`] cells, read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    record_type: RecordType,
    cells: Vec<Cell>,
}

impl ReportRow {
    /// Kind of the row.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// All cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`; out-of-range indices read as empty.
    #[must_use]
    pub fn get(&self, index: usize) -> &Cell {
        const EMPTY: Cell = Cell::Empty;
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    /// Number of cells, always [`FIELD_COUNT`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells rendered as text, for writing to a tabular sink.
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        self.cells.iter().map(ToString::to_string).collect()
    }

    /// Overwrites one cell of a finished row, for passes over a whole run.
    pub(crate) fn patch(&mut self, index: usize, value: impl Into<Cell>) {
        debug_assert!(index < FIELD_COUNT, "field {index} out of range");
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value.into();
        }
    }
}

/// A row under construction.
#[derive(Debug, Clone)]
pub(crate) struct RowDraft {
    record_type: RecordType,
    cells: Vec<Cell>,
}

impl RowDraft {
    pub(crate) fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            cells: vec![Cell::Empty; FIELD_COUNT],
        }
    }

    pub(crate) fn set(&mut self, index: usize, value: impl Into<Cell>) {
        debug_assert!(index < FIELD_COUNT, "field {index} out of range");
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value.into();
        }
    }

    pub(crate) fn finish(self) -> ReportRow {
        ReportRow {
            record_type: self.record_type,
            cells: self.cells,
        }
    }
}
