//! Heating accrual rows.

use tracing::debug;

use super::base::{BaseRow, HEATING_LABEL, RowContext};
use super::error::RowError;
use super::row::{RecordType, ReportRow, field};
use crate::facts::AccrualFact;
use crate::ledger::{AccountLedger, HEATING_SERVICE};
use crate::roster::AddressRoster;

const AREA_METER_CATEGORY: &str = "Общедомовый";
const AREA_METER_INSTALLED: &str = "01.01.2018";
const AREA_METER_LOCATION: &str = "Подвал";
const AREA_METER_MODEL: &str = "ВКТ-5";

/// The two building lists a heating row is decided by.
#[derive(Clone, Copy)]
pub struct HeatingRosters<'a> {
    /// Buildings with an area-level heat meter.
    pub area_meters: &'a dyn AddressRoster,
    /// Buildings whose heating was billed by average consumption.
    pub averages: &'a dyn AddressRoster,
}

/// Builds the heating accrual row of one account for one period.
///
/// Buildings with an area meter get the meter descriptor; those of them also
/// billed by average get the average chapter, everything else the normative
/// chapter. Payment and closing balance come from the heating ledger row,
/// which must exist.
pub fn heating_row(
    ctx: &RowContext<'_>,
    accrual: &AccrualFact,
    rosters: HeatingRosters<'_>,
    ledger: &dyn AccountLedger,
) -> Result<ReportRow, RowError> {
    let period = ctx.period;
    let account = ctx.account();
    let mut row = BaseRow::new(RecordType::HeatingAccural, ctx)?;
    row.draft.set(field::SERVICE, HEATING_LABEL);

    let year = period.year();
    let has_area_meter = rosters.area_meters.contains(year, &ctx.address.address);
    if has_area_meter {
        row.draft.set(field::METER_CATEGORY, AREA_METER_CATEGORY);
        row.draft.set(field::METER_INSTALLED, AREA_METER_INSTALLED);
        row.draft.set(field::METER_LOCATION, AREA_METER_LOCATION);
        row.draft.set(field::METER_CHANNELS, 1_i64);
        row.draft.set(field::METER_MODEL, AREA_METER_MODEL);
        row.draft.set(field::METER_NUMBER, 1_i64);
        row.draft.set(field::METER_DIGITS, 6_i64);
        row.draft.set(field::METER_PRECISION, 3_i64);
    }

    let quantity = row.quantity_of(accrual.heating, period)?;
    if has_area_meter && rosters.averages.contains(year, &ctx.address.address) {
        row.chapter(field::AVERAGE_QUANTITY, &quantity, accrual.heating);
    } else {
        row.draft.set(field::POPULATION, ctx.address.population);
        row.chapter(field::NORM_QUANTITY, &quantity, accrual.heating);
    }
    row.chapter(field::TOTAL_QUANTITY, &quantity, accrual.heating);

    let payment = ledger.payment(period, HEATING_SERVICE)?;
    row.payment(period, payment);
    let closing = ledger.closing_balance(period, HEATING_SERVICE)?;
    row.draft.set(field::CLOSING_BALANCE, closing);

    debug!(account, period = %period, %quantity, has_area_meter, "Built heating row");
    Ok(row.draft.finish())
}
