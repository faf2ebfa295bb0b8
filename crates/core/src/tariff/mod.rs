//! Heat energy tariffs.
//!
//! Row builders only need a price per period; where it comes from is the
//! caller's business. `TariffSchedule` is the stock implementation.

pub mod schedule;

pub use schedule::{TariffSchedule, TariffScheduleError};

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;

/// Source of the heat energy price for a period.
pub trait Tariff {
    /// Price in effect for `period`, or `None` when no price is known.
    fn price(&self, period: MonthYear) -> Option<Decimal>;
}

impl<T: Tariff + ?Sized> Tariff for &T {
    fn price(&self, period: MonthYear) -> Option<Decimal> {
        (**self).price(period)
    }
}
