//! Account ledger lookups.
//!
//! The ledger is the per-account statement of accruals, reaccruals, payments
//! and balances, one row per (period, service). Row builders read payments and
//! closing balances from it; the generator reads accruals and reaccruals.

pub mod details;
pub mod error;

pub use details::{AccountDetails, AccountDetailsRecord, Ledgers};
pub use error::LedgerError;

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;

/// Ledger service label for heating.
pub const HEATING_SERVICE: &str = "Отопление";

/// Ledger service label for hot-water heat energy.
pub const GVS_SERVICE: &str = "Тепловая энергия для подогрева воды";

/// Per-account ledger lookups by period and service label.
///
/// Every lookup fails with [`LedgerError::NoServiceRow`] when the ledger has
/// no row for the service in that period, which callers must be able to tell
/// apart from a zero amount.
pub trait AccountLedger {
    /// Payment posted in the period.
    fn payment(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError>;

    /// Balance at the end of the period.
    fn closing_balance(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError>;

    /// Amount accrued in the period.
    fn accrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError>;

    /// Reaccrual posted in the period.
    fn reaccrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError>;
}

impl<T: AccountLedger + ?Sized> AccountLedger for &T {
    fn payment(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        (**self).payment(period, service)
    }

    fn closing_balance(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        (**self).closing_balance(period, service)
    }

    fn accrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        (**self).accrual(period, service)
    }

    fn reaccrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        (**self).reaccrual(period, service)
    }
}
