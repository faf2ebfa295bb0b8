//! Report batch input.

use std::collections::BTreeMap;

use heatbill_shared::types::MonthYear;
use serde::{Deserialize, Serialize};

use crate::facts::{AccrualFact, AddressFact, MeteringFact, ReaccrualKind};
use crate::ledger::{AccountDetails, AccountDetailsRecord, Ledgers};
use crate::roster::YearlyAddressRoster;

/// Reaccrual information supplied with an account period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaccrualInput {
    /// Billing method of the period's reaccrual, if known.
    #[serde(default)]
    pub kind: Option<ReaccrualKind>,
}

/// Everything known about one account in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPeriodInput {
    /// Report period.
    pub period: MonthYear,
    /// Account and address.
    pub address: AddressFact,
    /// Accrued amounts.
    pub accrual: AccrualFact,
    /// Hot-water metering facts, in statement order.
    #[serde(default)]
    pub metering: Vec<MeteringFact>,
    /// Reaccrual billing method.
    #[serde(default)]
    pub reaccrual: Option<ReaccrualInput>,
}

impl AccountPeriodInput {
    /// Account the input belongs to.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.address.account
    }

    /// Billing method of the period's reaccrual, if supplied.
    #[must_use]
    pub fn reaccrual_kind(&self) -> Option<ReaccrualKind> {
        self.reaccrual.as_ref().and_then(|r| r.kind)
    }
}

/// One report run's input: rosters, ledgers, and account periods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportBatch {
    /// Buildings the report covers, per year. Absent means every building.
    #[serde(default)]
    pub buildings: Option<BTreeMap<i32, Vec<String>>>,
    /// Buildings with an area-level heat meter, per year.
    #[serde(default)]
    pub area_meters: BTreeMap<i32, Vec<String>>,
    /// Buildings billed for heating by average, per year.
    #[serde(default)]
    pub heating_averages: BTreeMap<i32, Vec<String>>,
    /// Account ledgers, keyed by account.
    #[serde(default)]
    pub ledgers: BTreeMap<String, Vec<AccountDetailsRecord>>,
    /// Account periods to report.
    #[serde(default)]
    pub periods: Vec<AccountPeriodInput>,
}

impl ReportBatch {
    /// Roster of buildings the report covers, if the batch restricts them.
    #[must_use]
    pub fn building_roster(&self) -> Option<YearlyAddressRoster> {
        self.buildings.as_ref().map(|years| roster("buildings", years))
    }

    /// Roster of buildings with an area-level meter.
    #[must_use]
    pub fn area_meter_roster(&self) -> YearlyAddressRoster {
        roster("area_meters", &self.area_meters)
    }

    /// Roster of buildings billed for heating by average.
    #[must_use]
    pub fn heating_average_roster(&self) -> YearlyAddressRoster {
        roster("heating_averages", &self.heating_averages)
    }

    /// Ledgers of all accounts in the batch.
    #[must_use]
    pub fn account_ledgers(&self) -> Ledgers {
        self.ledgers
            .iter()
            .map(|(account, records)| AccountDetails::new(account.clone(), records.clone()))
            .collect()
    }
}

fn roster(name: &str, years: &BTreeMap<i32, Vec<String>>) -> YearlyAddressRoster {
    let mut roster = YearlyAddressRoster::new(name);
    for (year, entries) in years {
        roster.insert_year(*year, entries);
    }
    roster
}
