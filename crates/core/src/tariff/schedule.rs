//! Stepwise tariff schedule.

use heatbill_shared::config::TariffEntry;
use heatbill_shared::types::{MonthYear, PeriodError};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use super::Tariff;

/// Errors building a tariff schedule from configuration.
#[derive(Debug, Error)]
pub enum TariffScheduleError {
    /// An entry's start period could not be parsed.
    #[error("Invalid tariff start period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// Tariffs must be positive.
    #[error("Tariff for {period} must be positive, got {price}")]
    NonPositivePrice {
        /// Period the entry starts at.
        period: MonthYear,
        /// Offending price.
        price: Decimal,
    },

    /// Two entries start at the same period.
    #[error("Duplicate tariff entry for {0}")]
    Duplicate(MonthYear),
}

/// Prices that change at given periods and stay in effect until the next change.
#[derive(Debug, Clone)]
pub struct TariffSchedule {
    /// Sorted by start period.
    steps: Vec<(MonthYear, Decimal)>,
    /// Last period the schedule is known to cover, if bounded.
    until: Option<MonthYear>,
}

impl TariffSchedule {
    /// Builds an open-ended schedule from `(start, price)` steps.
    pub fn new(
        steps: impl IntoIterator<Item = (MonthYear, Decimal)>,
    ) -> Result<Self, TariffScheduleError> {
        let mut steps: Vec<_> = steps.into_iter().collect();
        steps.sort_by_key(|(period, _)| *period);

        for pair in steps.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(TariffScheduleError::Duplicate(pair[0].0));
            }
        }
        if let Some((period, price)) = steps.iter().find(|(_, price)| *price <= Decimal::ZERO) {
            return Err(TariffScheduleError::NonPositivePrice {
                period: *period,
                price: *price,
            });
        }

        Ok(Self { steps, until: None })
    }

    /// Builds a schedule from configuration entries.
    pub fn from_entries(entries: &[TariffEntry]) -> Result<Self, TariffScheduleError> {
        let steps = entries
            .iter()
            .map(|entry| Ok((MonthYear::from_str(&entry.from)?, entry.price)))
            .collect::<Result<Vec<_>, TariffScheduleError>>()?;
        Self::new(steps)
    }

    /// Heating tariffs for 2020 through 2022, half-yearly.
    ///
    /// Periods after December 2022 have no price.
    #[must_use]
    pub fn builtin() -> Self {
        const STEPS: [(i32, u32, i64); 6] = [
            (2020, 1, 3_217_63),
            (2020, 7, 3_217_63),
            (2021, 1, 3_276_63),
            (2021, 7, 3_300_00),
            (2022, 1, 3_457_63),
            (2022, 7, 3_589_02),
        ];
        let steps = STEPS
            .iter()
            .filter_map(|&(year, month, cents)| {
                MonthYear::new(month, year)
                    .ok()
                    .map(|period| (period, Decimal::new(cents, 2)))
            })
            .collect();

        Self {
            steps,
            until: MonthYear::new(12, 2022).ok(),
        }
    }
}

impl Tariff for TariffSchedule {
    fn price(&self, period: MonthYear) -> Option<Decimal> {
        if self.until.is_some_and(|until| period > until) {
            return None;
        }
        self.steps
            .iter()
            .rev()
            .find(|(start, _)| *start <= period)
            .map(|(_, price)| *price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn my(month: u32, year: i32) -> MonthYear {
        MonthYear::new(month, year).unwrap()
    }

    #[test]
    fn test_builtin_half_years() {
        let schedule = TariffSchedule::builtin();
        assert_eq!(schedule.price(my(1, 2020)), Some(dec!(3217.63)));
        assert_eq!(schedule.price(my(12, 2020)), Some(dec!(3217.63)));
        assert_eq!(schedule.price(my(6, 2021)), Some(dec!(3276.63)));
        assert_eq!(schedule.price(my(7, 2021)), Some(dec!(3300.00)));
        assert_eq!(schedule.price(my(6, 2022)), Some(dec!(3457.63)));
        assert_eq!(schedule.price(my(12, 2022)), Some(dec!(3589.02)));
    }

    #[test]
    fn test_builtin_has_no_price_outside_range() {
        let schedule = TariffSchedule::builtin();
        assert_eq!(schedule.price(my(12, 2019)), None);
        assert_eq!(schedule.price(my(1, 2023)), None);
    }

    #[test]
    fn test_open_ended_schedule() {
        let schedule = TariffSchedule::new([(my(1, 2023), dec!(50.00))]).unwrap();
        assert_eq!(schedule.price(my(5, 2023)), Some(dec!(50.00)));
        assert_eq!(schedule.price(my(5, 2030)), Some(dec!(50.00)));
        assert_eq!(schedule.price(my(12, 2022)), None);
    }

    #[test]
    fn test_from_entries() {
        let entries = vec![
            TariffEntry {
                from: "2023-07".to_string(),
                price: dec!(60),
            },
            TariffEntry {
                from: "01.2023".to_string(),
                price: dec!(50),
            },
        ];
        let schedule = TariffSchedule::from_entries(&entries).unwrap();
        assert_eq!(schedule.price(my(6, 2023)), Some(dec!(50)));
        assert_eq!(schedule.price(my(7, 2023)), Some(dec!(60)));
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(matches!(
            TariffSchedule::new([(my(1, 2023), dec!(0))]),
            Err(TariffScheduleError::NonPositivePrice { .. })
        ));
        assert!(matches!(
            TariffSchedule::new([(my(1, 2023), dec!(1)), (my(1, 2023), dec!(2))]),
            Err(TariffScheduleError::Duplicate(_))
        ));
        let entries = vec![TariffEntry {
            from: "spring".to_string(),
            price: dec!(1),
        }];
        assert!(matches!(
            TariffSchedule::from_entries(&entries),
            Err(TariffScheduleError::InvalidPeriod(_))
        ));
    }
}
