//! Hot-water reaccrual rows.

use tracing::debug;

use super::base::{BaseRow, GVS_LABEL, RowContext};
use super::error::RowError;
use super::gvs::meter_descriptor;
use super::memo::InstallDateMemo;
use super::row::{RecordType, ReportRow, field};
use crate::facts::{MeteringFact, ReaccrualEvent, ReaccrualKind};

/// Builds the row for one reaccrual booked in the report period.
///
/// The row names the corrected month in the accrual period cells and fills
/// exactly one chapter, chosen by the reaccrual's billing method. The price is
/// the report period's. No ledger is consulted.
pub fn gvs_reaccrual_row(
    ctx: &RowContext<'_>,
    metering: &MeteringFact,
    event: &ReaccrualEvent,
    memo: &mut InstallDateMemo,
) -> Result<ReportRow, RowError> {
    let account = ctx.account();
    let Some(kind) = event.kind else {
        return Err(RowError::UnresolvedReaccrualKind {
            account: account.to_string(),
            period: event.period,
        });
    };
    memo.observe(account, ctx.period)?;

    let mut row = BaseRow::new(RecordType::GvsReaccural, ctx)?;
    row.draft.set(field::SERVICE, GVS_LABEL);
    row.draft.set(field::ACCRUAL_MONTH, i64::from(event.period.month()));
    row.draft.set(field::ACCRUAL_YEAR, i64::from(event.period.year()));
    meter_descriptor(&mut row, account, metering, memo);

    let quantity = row.quantity_of(event.amount, ctx.period)?;
    let chapter = match kind {
        ReaccrualKind::Meter => field::METER_QUANTITY,
        ReaccrualKind::Average => field::AVERAGE_QUANTITY,
        ReaccrualKind::Normative => field::NORM_QUANTITY,
    };
    row.chapter(chapter, &quantity, event.amount);
    row.chapter(field::TOTAL_QUANTITY, &quantity, event.amount);

    debug!(
        account,
        period = %ctx.period,
        corrected = %event.period,
        %kind,
        amount = %event.amount,
        "Built hot-water reaccrual row"
    );
    Ok(row.draft.finish())
}
