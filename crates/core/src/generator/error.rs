//! Report generation error types.

use heatbill_shared::types::MonthYear;
use thiserror::Error;

use crate::report::RowError;
use crate::sink::SinkError;

/// Errors that stop a report run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A row could not be built.
    #[error("Account {account}, period {period}: {source}")]
    Row {
        /// Account being processed.
        account: String,
        /// Period being processed.
        period: MonthYear,
        /// Underlying row error.
        #[source]
        source: RowError,
    },

    /// The sink failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl GenerateError {
    /// Wraps a row error with the account and period it occurred for.
    #[must_use]
    pub fn row(account: impl Into<String>, period: MonthYear, source: RowError) -> Self {
        Self::Row {
            account: account.into(),
            period,
            source,
        }
    }

    /// Returns the error code used in log records.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Row { source, .. } => source.error_code(),
            Self::Sink(err) => err.error_code(),
        }
    }
}
