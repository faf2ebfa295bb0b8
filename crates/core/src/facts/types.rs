//! Fact types consumed by the row builders.

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account identity and address for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFact {
    /// Personal account number.
    pub account: String,
    /// Full postal address as printed in the accrual statement.
    pub address: String,
    /// Number of residents used by the normative heating chapter.
    pub population: i64,
}

/// Money accrued for an account in one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualFact {
    /// Accrued heating amount.
    pub heating: Decimal,
    /// Accrued hot-water heat energy amount.
    pub gvs: Decimal,
    /// Total reaccrual posted in the period.
    #[serde(default)]
    pub reaccrual: Decimal,
    /// Total payment posted in the period.
    #[serde(default)]
    pub payment: Decimal,
}

impl AccrualFact {
    /// True when the account has anything worth a heating row.
    #[must_use]
    pub fn has_heating_activity(&self) -> bool {
        !(self.heating.is_zero() && self.reaccrual.is_zero() && self.payment.is_zero())
    }

    /// True when the account has anything worth a hot-water row.
    #[must_use]
    pub fn has_gvs_activity(&self) -> bool {
        !(self.gvs.is_zero() && self.reaccrual.is_zero() && self.payment.is_zero())
    }
}

/// One hot-water metering configuration for an account in one period.
///
/// A period carries two of these when the meter was replaced: the first
/// describes the removed meter, the second the installed one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeteringFact {
    /// Personal account number.
    pub account: String,
    /// Meter identifier in the metering system.
    #[serde(default)]
    pub counter_id: Option<String>,
    /// Meter serial number.
    #[serde(default)]
    pub counter_number: Option<String>,
    /// Latest reading.
    #[serde(default)]
    pub metric_current: Option<Decimal>,
    /// Date of the latest reading, `DD.MM.YYYY`.
    #[serde(default)]
    pub metric_date_current: Option<String>,
    /// Consumption derived from meter readings.
    #[serde(default)]
    pub consumption_ipu: Option<Decimal>,
    /// Consumption billed by average.
    #[serde(default)]
    pub consumption_average: Option<Decimal>,
    /// Consumption billed by norm.
    #[serde(default)]
    pub consumption_normative: Option<Decimal>,
    /// Registered residents.
    #[serde(default)]
    pub people_registered: Option<i64>,
}

impl MeteringFact {
    /// A fact with no metering data, for accounts absent from the metering list.
    #[must_use]
    pub fn empty(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            ..Self::default()
        }
    }

    /// True when the account has an individual meter.
    #[must_use]
    pub fn has_counter(&self) -> bool {
        is_present(self.counter_id.as_deref()) || is_present(self.counter_number.as_deref())
    }

    /// True when consumption was derived from the meter.
    #[must_use]
    pub fn billed_by_meter(&self) -> bool {
        is_nonzero(self.consumption_ipu)
    }

    /// True when consumption was billed by average.
    #[must_use]
    pub fn billed_by_average(&self) -> bool {
        is_nonzero(self.consumption_average)
    }

    /// True when consumption was billed by norm.
    #[must_use]
    pub fn billed_by_norm(&self) -> bool {
        is_nonzero(self.consumption_normative)
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn is_nonzero(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| !v.is_zero())
}

/// Basis a reaccrual was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReaccrualKind {
    /// Individual meter readings.
    Meter,
    /// Average consumption.
    Average,
    /// Consumption norm.
    Normative,
}

/// Reaccrual kind text that names none of the known bases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown reaccrual kind: '{0}'")]
pub struct UnknownReaccrualKind(pub String);

impl std::str::FromStr for ReaccrualKind {
    type Err = UnknownReaccrualKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ipu" | "meter" => Ok(Self::Meter),
            "average" => Ok(Self::Average),
            "normative" => Ok(Self::Normative),
            _ => Err(UnknownReaccrualKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for ReaccrualKind {
    type Error = UnknownReaccrualKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReaccrualKind> for String {
    fn from(kind: ReaccrualKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for ReaccrualKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Meter => write!(f, "ipu"),
            Self::Average => write!(f, "average"),
            Self::Normative => write!(f, "normative"),
        }
    }
}

/// A retroactive correction of one earlier period's accrual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaccrualEvent {
    /// Period whose accrual is corrected.
    pub period: MonthYear,
    /// Correction amount.
    pub amount: Decimal,
    /// Basis of the correction; `None` when it could not be determined.
    pub kind: Option<ReaccrualKind>,
}
