//! Meter install dates remembered across the rows of one run.

use std::collections::HashMap;

use heatbill_shared::types::MonthYear;
use tracing::debug;

use super::error::RowError;

/// Install date used when nothing was recorded for an account.
pub const DEFAULT_INSTALL_DATE: &str = "01.01.2019";

/// Install dates of replaced hot-water meters, per account.
///
/// Written by the opening row of an in-period meter replacement and by the
/// pass that finds replacements between periods; every hot-water row reads
/// from it. Reads are only meaningful when an account's periods
/// arrive oldest first, so every builder calls [`InstallDateMemo::observe`]
/// before reading, which rejects a period older than one already built.
#[derive(Debug, Clone)]
pub struct InstallDateMemo {
    default_date: String,
    dates: HashMap<String, String>,
    latest: HashMap<String, MonthYear>,
    fallbacks: usize,
}

impl Default for InstallDateMemo {
    fn default() -> Self {
        Self::new(DEFAULT_INSTALL_DATE)
    }
}

impl InstallDateMemo {
    /// Creates an empty memo answering `default_date` for unknown accounts.
    #[must_use]
    pub fn new(default_date: impl Into<String>) -> Self {
        Self {
            default_date: default_date.into(),
            dates: HashMap::new(),
            latest: HashMap::new(),
            fallbacks: 0,
        }
    }

    /// Registers that a row of `account` for `period` is being built.
    pub fn observe(&mut self, account: &str, period: MonthYear) -> Result<(), RowError> {
        match self.latest.get(account) {
            Some(latest) if *latest > period => Err(RowError::OutOfOrderPeriod {
                account: account.to_string(),
                period,
                latest: *latest,
            }),
            Some(latest) if *latest == period => Ok(()),
            _ => {
                self.latest.insert(account.to_string(), period);
                Ok(())
            }
        }
    }

    /// Install date for `account`, or the default when none was recorded.
    pub fn install_date(&mut self, account: &str) -> String {
        if let Some(date) = self.dates.get(account) {
            return date.clone();
        }
        self.fallbacks += 1;
        self.default_date.clone()
    }

    /// Install date recorded for `account`, without falling back.
    #[must_use]
    pub fn recorded(&self, account: &str) -> Option<&str> {
        self.dates.get(account).map(String::as_str)
    }

    /// Records the install date of a newly installed meter.
    pub fn record(&mut self, account: &str, date: impl Into<String>) {
        let date = date.into();
        debug!(account, %date, "Recorded meter install date");
        self.dates.insert(account.to_string(), date);
    }

    /// How many reads fell back to the default date.
    #[must_use]
    pub const fn fallback_count(&self) -> usize {
        self.fallbacks
    }

    /// Number of accounts with a recorded date.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when no date was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Forgets everything, for reuse in another run.
    pub fn reset(&mut self) {
        self.dates.clear();
        self.latest.clear();
        self.fallbacks = 0;
    }
}
