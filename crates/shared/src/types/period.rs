//! Billing period type.
//!
//! A billing period is a calendar month. Periods are ordered by year and then
//! month, which is what sequential report generation relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when building or parsing a [`MonthYear`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month is outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Text could not be understood as a period.
    #[error("Invalid period: '{0}' (expected MM.YYYY or YYYY-MM)")]
    Unparsable(String),
}

/// A billing period: one calendar month of one year.
///
/// Field order matters: the derived ordering compares `year` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMonthYear")]
pub struct MonthYear {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawMonthYear {
    month: u32,
    year: i32,
}

impl TryFrom<RawMonthYear> for MonthYear {
    type Error = PeriodError;

    fn try_from(raw: RawMonthYear) -> Result<Self, Self::Error> {
        Self::new(raw.month, raw.year)
    }
}

impl MonthYear {
    /// Creates a period, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> Result<Self, PeriodError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(PeriodError::InvalidMonth(month))
        }
    }

    /// Month number, 1..=12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month > 1 {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        } else {
            Self {
                year: self.year - 1,
                month: 12,
            }
        }
    }

    /// The month after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month < 12 {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        } else {
            Self {
                year: self.year + 1,
                month: 1,
            }
        }
    }

    /// Calendar date for the given day of this month, if it exists.
    #[must_use]
    pub fn date_on(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl std::fmt::Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{}", self.month, self.year)
    }
}

impl std::str::FromStr for MonthYear {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unparsable = || PeriodError::Unparsable(s.to_string());

        let (month, year) = if let Some((month, year)) = s.split_once('.') {
            (month, year)
        } else if let Some((year, month)) = s.split_once('-') {
            (month, year)
        } else {
            return Err(unparsable());
        };

        let month = month.parse::<u32>().map_err(|_| unparsable())?;
        let year = year.parse::<i32>().map_err(|_| unparsable())?;
        Self::new(month, year)
    }
}
