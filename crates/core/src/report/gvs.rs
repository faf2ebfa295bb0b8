//! Hot-water accrual rows, including the pair written when a meter is replaced.

use tracing::{debug, warn};

use super::base::{BaseRow, GVS_LABEL, RowContext, zero_if_missing};
use super::error::RowError;
use super::memo::InstallDateMemo;
use super::row::{RecordType, ReportRow, field};
use crate::facts::{AccrualFact, MeteringFact};
use crate::ledger::{AccountLedger, GVS_SERVICE};

const METER_CATEGORY: &str = "Индивидуальный";
const METER_MODEL: &str = "СГВ-15";
const SOURCE_SUBSCRIBER: &str = "От абонента (прочие)";

/// Reading source of a meter's last reading before removal.
pub const SOURCE_REMOVAL: &str = "При снятии прибора";

/// Reading source of a new meter's first reading.
pub const SOURCE_INSTALLATION: &str = "При установке";

/// Suffix of serial numbers synthesized from a meter id.
const SYNTHESIZED_SUFFIX: &str = "_2";

/// Serial number to report for a metering fact, and the fact carrying it.
///
/// A fact with an id but no serial number gets `<id>_2`. The returned fact has
/// the resolved number filled in; the input is left untouched.
#[must_use]
pub fn resolve_counter_number(fact: &MeteringFact) -> (Option<String>, MeteringFact) {
    let number = present(fact.counter_number.as_deref()).map(str::to_string).or_else(|| {
        present(fact.counter_id.as_deref()).map(|id| format!("{id}{SYNTHESIZED_SUFFIX}"))
    });
    let mut normalized = fact.clone();
    if number.is_some() {
        normalized.counter_number.clone_from(&number);
    }
    (number, normalized)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Writes the individual meter descriptor, if the fact has a meter.
///
/// Returns whether it did.
pub(crate) fn meter_descriptor(
    row: &mut BaseRow,
    account: &str,
    metering: &MeteringFact,
    memo: &mut InstallDateMemo,
) -> bool {
    if !metering.has_counter() {
        return false;
    }
    let (number, _) = resolve_counter_number(metering);
    row.draft.set(field::METER_CATEGORY, METER_CATEGORY);
    row.draft.set(field::METER_INSTALLED, memo.install_date(account));
    row.draft.set(field::METER_MODEL, METER_MODEL);
    row.draft.set(field::METER_NUMBER, number);
    row.draft.set(field::METER_DIGITS, 6_i64);
    row.draft.set(field::METER_PRECISION, 3_i64);
    true
}

/// Identity, meter descriptor and reading of a hot-water accrual row.
fn gvs_reading_row(
    ctx: &RowContext<'_>,
    metering: &MeteringFact,
    memo: &mut InstallDateMemo,
) -> Result<BaseRow, RowError> {
    let account = ctx.account();
    memo.observe(account, ctx.period)?;

    let mut row = BaseRow::new(RecordType::GvsAccural, ctx)?;
    row.draft.set(field::SERVICE, GVS_LABEL);

    if meter_descriptor(&mut row, account, metering, memo) {
        if let Some(reading) = metering.metric_current {
            row.draft.set(field::READING_DATE, metering.metric_date_current.clone());
            row.draft.set(field::READING_SOURCE, SOURCE_SUBSCRIBER);
            row.draft.set(field::READING, reading);
        }
        row.draft.set(field::METER_CONSUMPTION, metering.consumption_ipu);
    }
    Ok(row)
}

/// Shared part of every hot-water accrual row that carries amounts.
fn gvs_base_row(
    ctx: &RowContext<'_>,
    accrual: &AccrualFact,
    metering: &MeteringFact,
    ledger: &dyn AccountLedger,
    memo: &mut InstallDateMemo,
) -> Result<BaseRow, RowError> {
    let period = ctx.period;
    let account = ctx.account();
    let mut row = gvs_reading_row(ctx, metering, memo)?;

    let quantity = row.quantity_of(accrual.gvs, period)?;
    if metering.billed_by_meter() {
        row.chapter(field::METER_QUANTITY, &quantity, accrual.gvs);
    }
    if metering.billed_by_average() {
        row.chapter(field::AVERAGE_QUANTITY, &quantity, accrual.gvs);
    }
    if metering.billed_by_norm() {
        row.draft.set(field::POPULATION, metering.people_registered);
        row.chapter(field::NORM_QUANTITY, &quantity, accrual.gvs);
    }
    row.chapter(field::TOTAL_QUANTITY, &quantity, accrual.gvs);

    let payment = zero_if_missing(
        ledger.payment(period, GVS_SERVICE),
        account,
        period,
        "payment",
    )?;
    row.payment(period, payment);
    let closing = zero_if_missing(
        ledger.closing_balance(period, GVS_SERVICE),
        account,
        period,
        "closing balance",
    )?;
    row.draft.set(field::CLOSING_BALANCE, closing);

    debug!(account, period = %period, %quantity, "Built hot-water row");
    Ok(row)
}

/// Builds the hot-water row of a period with one metering configuration.
pub fn gvs_row(
    ctx: &RowContext<'_>,
    accrual: &AccrualFact,
    metering: &MeteringFact,
    ledger: &dyn AccountLedger,
    memo: &mut InstallDateMemo,
) -> Result<ReportRow, RowError> {
    gvs_base_row(ctx, accrual, metering, ledger, memo).map(|row| row.draft.finish())
}

/// Builds the row for the meter removed during the period.
pub fn gvs_closing_row(
    ctx: &RowContext<'_>,
    accrual: &AccrualFact,
    removed: &MeteringFact,
    ledger: &dyn AccountLedger,
    memo: &mut InstallDateMemo,
) -> Result<ReportRow, RowError> {
    let mut row = gvs_base_row(ctx, accrual, removed, ledger, memo)?;
    if removed.metric_current.is_some() {
        row.draft.set(field::READING_SOURCE, SOURCE_REMOVAL);
    }
    Ok(row.draft.finish())
}

/// Builds the row for the meter installed during the period.
///
/// The installation reading date becomes the meter's install date, both in
/// this row and in the memo. The row carries no amounts, so columns 23
/// through 45 stay empty and the ledger is not consulted.
pub fn gvs_opening_row(
    ctx: &RowContext<'_>,
    installed: &MeteringFact,
    memo: &mut InstallDateMemo,
) -> Result<ReportRow, RowError> {
    let mut row = gvs_reading_row(ctx, installed, memo)?;
    let account = ctx.account();

    row.draft.set(field::METER_INSTALLED, installed.metric_date_current.clone());
    match &installed.metric_date_current {
        Some(date) => memo.record(account, date.clone()),
        None => warn!(
            account,
            period = %ctx.period,
            "Installed meter has no reading date, install date not recorded"
        ),
    }
    if installed.metric_current.is_some() {
        row.draft.set(field::READING_SOURCE, SOURCE_INSTALLATION);
    }
    Ok(row.draft.finish())
}

/// Builds the rows for a period's metering facts, in order.
///
/// No facts give no row, one fact gives one row, two give a closing and an
/// opening row. With more than two, the first and last are used.
pub fn gvs_rows(
    ctx: &RowContext<'_>,
    accrual: &AccrualFact,
    metering: &[MeteringFact],
    ledger: &dyn AccountLedger,
    memo: &mut InstallDateMemo,
) -> Result<Vec<ReportRow>, RowError> {
    match metering {
        [] => Ok(Vec::new()),
        [single] => Ok(vec![gvs_row(ctx, accrual, single, ledger, memo)?]),
        [removed, .., installed] => {
            if metering.len() > 2 {
                warn!(
                    account = ctx.account(),
                    period = %ctx.period,
                    count = metering.len(),
                    "More than two metering facts, using the first and the last"
                );
            }
            Ok(vec![
                gvs_closing_row(ctx, accrual, removed, ledger, memo)?,
                gvs_opening_row(ctx, installed, memo)?,
            ])
        }
    }
}
