//! Report generation service.

use std::fmt;

use heatbill_shared::types::MonthYear;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::batch::AccountPeriodInput;
use super::error::GenerateError;
use super::replacement::mark_meter_replacements;
use crate::facts::MeteringFact;
use crate::ledger::{AccountDetails, AccountLedger, GVS_SERVICE, Ledgers};
use crate::reaccrual::decompose;
use crate::report::{
    HeatingRosters, InstallDateMemo, RecordType, ReportRow, RowContext, RowError,
    gvs_reaccrual_row, gvs_rows, heating_row, resolve_counter_number,
};
use crate::roster::AddressRoster;
use crate::sink::ReportSink;
use crate::tariff::Tariff;

/// What a run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Account periods processed.
    pub account_periods: usize,
    /// Account periods skipped because the building is not on the list.
    pub unlisted_addresses: usize,
    /// Heating accrual rows.
    pub heating_rows: usize,
    /// Hot-water accrual rows.
    pub gvs_rows: usize,
    /// Hot-water reaccrual rows.
    pub gvs_reaccrual_rows: usize,
    /// Heating rows skipped for lack of a ledger row.
    pub skipped_heating_rows: usize,
    /// Reaccruals that could not be spread over previous months.
    pub undecomposed_reaccruals: usize,
    /// Meter replacements found between consecutive periods.
    pub meter_replacements: usize,
    /// Install date reads that fell back to the default.
    pub memo_fallbacks: usize,
}

impl RunSummary {
    /// Total rows written.
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.heating_rows + self.gvs_rows + self.gvs_reaccrual_rows
    }

    fn count(&mut self, row: &ReportRow) {
        match row.record_type() {
            RecordType::HeatingAccural | RecordType::HeatingReaccural => {
                self.heating_rows += 1;
            }
            RecordType::GvsAccural => self.gvs_rows += 1,
            RecordType::GvsReaccural => self.gvs_reaccrual_rows += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows ({} heating, {} hot water, {} reaccrual) from {} account periods",
            self.total_rows(),
            self.heating_rows,
            self.gvs_rows,
            self.gvs_reaccrual_rows,
            self.account_periods
        )
    }
}

/// Turns account periods into report rows.
///
/// Account periods are processed oldest first. Per account and period the
/// heating row comes first, then the hot-water rows, then one row per month
/// a hot-water reaccrual is spread over. With a buildings list, periods of
/// addresses not on that year's list produce nothing.
pub struct ReportGenerator<'a> {
    tariff: &'a dyn Tariff,
    rosters: HeatingRosters<'a>,
    buildings: Option<&'a dyn AddressRoster>,
    ledgers: &'a Ledgers,
    memo: InstallDateMemo,
    summary: RunSummary,
}

impl<'a> ReportGenerator<'a> {
    /// Creates a generator over the given collaborators.
    #[must_use]
    pub fn new(
        tariff: &'a dyn Tariff,
        rosters: HeatingRosters<'a>,
        ledgers: &'a Ledgers,
        memo: InstallDateMemo,
    ) -> Self {
        Self {
            tariff,
            rosters,
            buildings: None,
            ledgers,
            memo,
            summary: RunSummary::default(),
        }
    }

    /// Restricts the report to buildings on the yearly list.
    #[must_use]
    pub fn with_buildings(mut self, buildings: &'a dyn AddressRoster) -> Self {
        self.buildings = Some(buildings);
        self
    }

    /// Processes every account period, marks meter replacements across
    /// periods, then appends the rows to the sink and saves it.
    ///
    /// Starts from an empty memo. Inputs are stably sorted by period first.
    /// Nothing reaches the sink when a row fails.
    pub fn run<S>(
        &mut self,
        mut inputs: Vec<AccountPeriodInput>,
        sink: &mut S,
    ) -> Result<RunSummary, GenerateError>
    where
        S: ReportSink + ?Sized,
    {
        self.memo.reset();
        self.summary = RunSummary::default();
        inputs.sort_by_key(|input| input.period);

        let mut rows = Vec::new();
        for input in &inputs {
            rows.extend(self.process(input)?);
        }
        self.summary.meter_replacements = mark_meter_replacements(&mut rows, &mut self.memo);

        for row in rows {
            sink.append(row);
        }
        sink.save()?;

        self.summary.memo_fallbacks = self.memo.fallback_count();
        let summary = self.summary;
        info!(
            account_periods = summary.account_periods,
            heating = summary.heating_rows,
            gvs = summary.gvs_rows,
            gvs_reaccrual = summary.gvs_reaccrual_rows,
            skipped_heating = summary.skipped_heating_rows,
            unlisted = summary.unlisted_addresses,
            replacements = summary.meter_replacements,
            "Report run finished"
        );
        if summary.memo_fallbacks > 0 {
            warn!(
                fallbacks = summary.memo_fallbacks,
                "Meter install dates defaulted for accounts without a recorded replacement"
            );
        }
        if summary.undecomposed_reaccruals > 0 {
            warn!(
                count = summary.undecomposed_reaccruals,
                "Reaccruals kept whole in their booking period"
            );
        }
        Ok(summary)
    }

    /// Builds the rows of one account period.
    pub fn process(&mut self, input: &AccountPeriodInput) -> Result<Vec<ReportRow>, GenerateError> {
        let period = input.period;
        let account = input.account();
        if let Some(buildings) = self.buildings
            && !buildings.contains(period.year(), &input.address.address)
        {
            debug!(account, period = %period, "Building not on the list, skipped");
            self.summary.unlisted_addresses += 1;
            return Ok(Vec::new());
        }

        let ctx = RowContext::new(period, &input.address, self.tariff);
        let wrap = |err: RowError| GenerateError::row(account, period, err);

        let ledgers = self.ledgers;
        let empty_ledger;
        let ledger: &dyn AccountLedger = if let Some(details) = ledgers.get(account) {
            details
        } else {
            warn!(account, period = %period, "No ledger for account, treating as empty");
            empty_ledger = AccountDetails::new(account, Vec::new());
            &empty_ledger
        };
        self.summary.account_periods += 1;
        let mut rows = Vec::new();

        if input.accrual.has_heating_activity() {
            match heating_row(&ctx, &input.accrual, self.rosters, ledger) {
                Ok(row) => self.emit(row, &mut rows),
                Err(err) if err.is_skippable() => {
                    debug!(account, period = %period, error = %err, "Heating row skipped");
                    self.summary.skipped_heating_rows += 1;
                }
                Err(err) => return Err(wrap(err)),
            }
        }

        let metering: Vec<MeteringFact> = input
            .metering
            .iter()
            .map(|fact| resolve_counter_number(fact).1)
            .collect();

        if input.accrual.has_gvs_activity() {
            let built = gvs_rows(&ctx, &input.accrual, &metering, ledger, &mut self.memo)
                .map_err(wrap)?;
            for row in built {
                self.emit(row, &mut rows);
            }
        }

        let Some(total) = booked_reaccrual(ledger, account, period).map_err(wrap)? else {
            return Ok(rows);
        };
        let decomposition = decompose(ledger, period, total).map_err(|err| wrap(err.into()))?;
        if !decomposition.valid {
            self.summary.undecomposed_reaccruals += 1;
        }
        let fact = metering
            .first()
            .cloned()
            .unwrap_or_else(|| MeteringFact::empty(account));
        for event in decomposition.into_events(input.reaccrual_kind()) {
            let row = gvs_reaccrual_row(&ctx, &fact, &event, &mut self.memo).map_err(wrap)?;
            self.emit(row, &mut rows);
        }
        Ok(rows)
    }

    /// Counters of the current run so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            memo_fallbacks: self.memo.fallback_count(),
            ..self.summary
        }
    }

    /// Install dates collected so far.
    #[must_use]
    pub fn memo(&self) -> &InstallDateMemo {
        &self.memo
    }

    fn emit(&mut self, row: ReportRow, rows: &mut Vec<ReportRow>) {
        self.summary.count(&row);
        rows.push(row);
    }
}

/// Hot-water reaccrual booked in the period, if any.
fn booked_reaccrual(
    ledger: &dyn AccountLedger,
    account: &str,
    period: MonthYear,
) -> Result<Option<Decimal>, RowError> {
    match ledger.reaccrual(period, GVS_SERVICE) {
        Ok(total) if total.is_zero() => Ok(None),
        Ok(total) => {
            debug!(account, period = %period, %total, "Hot-water reaccrual booked");
            Ok(Some(total))
        }
        Err(err) if err.is_missing_row() => Ok(None),
        Err(err) => Err(err.into()),
    }
}
