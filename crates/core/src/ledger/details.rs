//! In-memory account ledgers.

use std::collections::HashMap;

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{AccountLedger, LedgerError};

const MONTH_NAMES: [&str; 12] = [
    "январь",
    "февраль",
    "март",
    "апрель",
    "май",
    "июнь",
    "июль",
    "август",
    "сентябрь",
    "октябрь",
    "ноябрь",
    "декабрь",
];

/// Resolves a month given as a number or a Russian month name.
pub fn parse_month(raw: &str) -> Result<u32, LedgerError> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<u32>() {
        if (1..=12).contains(&number) {
            return Ok(number);
        }
        return Err(LedgerError::InvalidMonth(raw.to_string()));
    }
    let lowered = raw.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == lowered)
        .and_then(|index| u32::try_from(index + 1).ok())
        .ok_or_else(|| LedgerError::InvalidMonth(raw.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MonthField {
    Number(u32),
    Name(String),
}

fn deserialize_month<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match MonthField::deserialize(deserializer)? {
        MonthField::Number(number) => number.to_string(),
        MonthField::Name(name) => name,
    };
    parse_month(&raw).map_err(serde::de::Error::custom)
}

/// One ledger row: a service's movements in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetailsRecord {
    /// Calendar year.
    pub year: i32,
    /// Month, given as a number or a Russian month name.
    #[serde(deserialize_with = "deserialize_month")]
    pub month: u32,
    /// Service label.
    pub service: String,
    /// Balance at the start of the period.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Amount accrued.
    #[serde(default)]
    pub accrual: Decimal,
    /// Reaccrual posted.
    #[serde(default)]
    pub reaccrual: Decimal,
    /// Payment posted.
    #[serde(default)]
    pub payment: Decimal,
    /// Balance at the end of the period.
    #[serde(default)]
    pub closing_balance: Decimal,
}

impl AccountDetailsRecord {
    /// Period of the row, if the month is valid.
    pub fn period(&self) -> Option<MonthYear> {
        MonthYear::new(self.month, self.year).ok()
    }
}

/// The ledger of one account.
#[derive(Debug, Clone, Default)]
pub struct AccountDetails {
    account: String,
    records: Vec<AccountDetailsRecord>,
}

impl AccountDetails {
    /// Creates a ledger from its rows.
    #[must_use]
    pub fn new(account: impl Into<String>, records: Vec<AccountDetailsRecord>) -> Self {
        Self {
            account: account.into(),
            records,
        }
    }

    /// Account the ledger belongs to.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the ledger has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn service_row(
        &self,
        period: MonthYear,
        service: &str,
    ) -> Result<&AccountDetailsRecord, LedgerError> {
        let mut matching = self
            .records
            .iter()
            .filter(|r| r.period() == Some(period) && r.service == service);

        match (matching.next(), matching.count()) {
            (None, _) => Err(LedgerError::NoServiceRow {
                account: self.account.clone(),
                period,
                service: service.to_string(),
            }),
            (Some(record), 0) => Ok(record),
            (Some(_), rest) => Err(LedgerError::DuplicateServiceRow {
                account: self.account.clone(),
                period,
                service: service.to_string(),
                count: rest + 1,
            }),
        }
    }
}

impl AccountLedger for AccountDetails {
    fn payment(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        self.service_row(period, service).map(|r| r.payment)
    }

    fn closing_balance(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        self.service_row(period, service).map(|r| r.closing_balance)
    }

    fn accrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        self.service_row(period, service).map(|r| r.accrual)
    }

    fn reaccrual(&self, period: MonthYear, service: &str) -> Result<Decimal, LedgerError> {
        self.service_row(period, service).map(|r| r.reaccrual)
    }
}

/// Ledgers of all accounts in a run, keyed by account.
#[derive(Debug, Clone, Default)]
pub struct Ledgers {
    by_account: HashMap<String, AccountDetails>,
}

impl Ledgers {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an account's ledger.
    pub fn insert(&mut self, details: AccountDetails) {
        self.by_account.insert(details.account.clone(), details);
    }

    /// Ledger of `account`, if known.
    #[must_use]
    pub fn get(&self, account: &str) -> Option<&AccountDetails> {
        self.by_account.get(account)
    }

    /// Number of accounts with a ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    /// True when no ledgers are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }
}

impl FromIterator<AccountDetails> for Ledgers {
    fn from_iter<I: IntoIterator<Item = AccountDetails>>(iter: I) -> Self {
        let mut ledgers = Self::new();
        for details in iter {
            ledgers.insert(details);
        }
        ledgers
    }
}
