//! Account ledger error types.

use heatbill_shared::types::MonthYear;
use thiserror::Error;

/// Errors that can occur during account ledger lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The ledger has no row for the service in the period.
    ///
    /// Distinct from a row whose amounts are zero.
    #[error("No '{service}' row for {period} in ledger of account {account}")]
    NoServiceRow {
        /// Account the ledger belongs to.
        account: String,
        /// Period looked up.
        period: MonthYear,
        /// Service label looked up.
        service: String,
    },

    /// The ledger has more than one row for the service in the period.
    #[error("{count} '{service}' rows for {period} in ledger of account {account}")]
    DuplicateServiceRow {
        /// Account the ledger belongs to.
        account: String,
        /// Period looked up.
        period: MonthYear,
        /// Service label looked up.
        service: String,
        /// Number of matching rows.
        count: usize,
    },

    /// A record names a month that does not exist.
    #[error("Invalid ledger month: '{0}'")]
    InvalidMonth(String),
}

impl LedgerError {
    /// Returns the error code used in log records.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoServiceRow { .. } => "NO_SERVICE_ROW",
            Self::DuplicateServiceRow { .. } => "DUPLICATE_SERVICE_ROW",
            Self::InvalidMonth(_) => "INVALID_LEDGER_MONTH",
        }
    }

    /// True when the lookup found nothing, as opposed to ambiguous data.
    #[must_use]
    pub fn is_missing_row(&self) -> bool {
        matches!(self, Self::NoServiceRow { .. })
    }
}
