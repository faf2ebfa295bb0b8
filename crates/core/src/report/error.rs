//! Row construction error types.

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::facts::UnknownReaccrualKind;
use crate::ledger::LedgerError;

/// Errors that can occur while building a report row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// No tariff price is known for the period.
    #[error("No tariff for {0}")]
    NoTariff(MonthYear),

    /// The tariff price cannot be divided by.
    #[error("Invalid tariff {price} for {period}")]
    InvalidTariff {
        /// Period the price applies to.
        period: MonthYear,
        /// Offending price.
        price: Decimal,
    },

    /// A reaccrual reached the row builder without a billing method.
    #[error("Reaccrual kind unresolved for account {account} in {period}")]
    UnresolvedReaccrualKind {
        /// Account of the reaccrual.
        account: String,
        /// Month the reaccrual corrects.
        period: MonthYear,
    },

    /// A reaccrual carries a billing method that is not recognised.
    #[error(transparent)]
    UnknownReaccrualKind(#[from] UnknownReaccrualKind),

    /// An account's periods were processed out of order.
    #[error("Account {account}: period {period} processed after {latest}")]
    OutOfOrderPeriod {
        /// Account concerned.
        account: String,
        /// Period being built.
        period: MonthYear,
        /// Latest period already built for the account.
        latest: MonthYear,
    },

    /// A ledger lookup failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RowError {
    /// Returns the error code used in log records.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoTariff(_) => "NO_TARIFF",
            Self::InvalidTariff { .. } => "INVALID_TARIFF",
            Self::UnresolvedReaccrualKind { .. } => "UNRESOLVED_REACCRUAL_KIND",
            Self::UnknownReaccrualKind(_) => "UNKNOWN_REACCRUAL_KIND",
            Self::OutOfOrderPeriod { .. } => "OUT_OF_ORDER_PERIOD",
            Self::Ledger(err) => err.error_code(),
        }
    }

    /// True when the row can be skipped and the run continued.
    ///
    /// Only a missing ledger row qualifies; everything else stops the run.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Ledger(err) if err.is_missing_row())
    }
}
