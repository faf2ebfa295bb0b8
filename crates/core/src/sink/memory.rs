//! In-memory sink.

use super::{ReportSink, SinkError};
use crate::report::ReportRow;

/// Keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<ReportRow>,
    saved: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row appended so far.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows covered by the last save.
    #[must_use]
    pub fn saved_rows(&self) -> &[ReportRow] {
        &self.rows[..self.saved]
    }
}

impl ReportSink for MemorySink {
    fn append(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    fn save(&mut self) -> Result<(), SinkError> {
        self.saved = self.rows.len();
        Ok(())
    }
}
