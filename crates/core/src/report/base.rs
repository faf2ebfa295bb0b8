//! Cells shared by every row kind.

use heatbill_shared::types::{MonthYear, format_quantity, quantity};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::RowError;
use super::row::{RecordType, RowDraft, field};
use crate::facts::AddressFact;
use crate::ledger::LedgerError;
use crate::tariff::Tariff;

/// Service label of heating rows.
pub const HEATING_LABEL: &str = "Отопление";

/// Service label of hot-water rows.
pub const GVS_LABEL: &str = "Тепловая энергия ГВС";

/// Day of month written as the payment period bounds.
pub const PAYMENT_DAY: u32 = 20;

const PAYMENT_LABEL: &str = "Оплата";
const REFUND_LABEL: &str = "Возврат оплаты";

/// What every row is built for: a period, an account, and the price source.
#[derive(Clone, Copy)]
pub struct RowContext<'a> {
    /// Report period.
    pub period: MonthYear,
    /// Account and address.
    pub address: &'a AddressFact,
    /// Price source.
    pub tariff: &'a dyn Tariff,
}

impl<'a> RowContext<'a> {
    /// Bundles the inputs every row builder needs.
    #[must_use]
    pub fn new(period: MonthYear, address: &'a AddressFact, tariff: &'a dyn Tariff) -> Self {
        Self {
            period,
            address,
            tariff,
        }
    }

    /// Account the row is built for.
    #[must_use]
    pub fn account(&self) -> &'a str {
        &self.address.account
    }
}

impl std::fmt::Debug for RowContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowContext")
            .field("period", &self.period)
            .field("address", self.address)
            .finish_non_exhaustive()
    }
}

/// A draft with the identity cells filled in, plus the price it used.
pub(crate) struct BaseRow {
    pub(crate) draft: RowDraft,
    pub(crate) price: Decimal,
}

impl BaseRow {
    /// Starts a row: report and accrual period, account, address, record
    /// type and price.
    pub(crate) fn new(record_type: RecordType, ctx: &RowContext<'_>) -> Result<Self, RowError> {
        let period = ctx.period;
        let price = ctx.tariff.price(period).ok_or(RowError::NoTariff(period))?;
        if price <= Decimal::ZERO {
            return Err(RowError::InvalidTariff { period, price });
        }

        let mut draft = RowDraft::new(record_type);
        draft.set(field::REPORT_MONTH, i64::from(period.month()));
        draft.set(field::REPORT_YEAR, i64::from(period.year()));
        draft.set(field::ACCOUNT, ctx.address.account.as_str());
        draft.set(field::ADDRESS, ctx.address.address.as_str());
        draft.set(field::RECORD_TYPE, record_type.code());
        draft.set(field::ACCRUAL_MONTH, i64::from(period.month()));
        draft.set(field::ACCRUAL_YEAR, i64::from(period.year()));
        draft.set(field::PRICE, price);

        Ok(Self { draft, price })
    }

    /// `amount / price` as four-decimal text.
    pub(crate) fn quantity_of(
        &self,
        amount: Decimal,
        period: MonthYear,
    ) -> Result<String, RowError> {
        quantity(amount, self.price)
            .map(format_quantity)
            .ok_or(RowError::InvalidTariff {
                period,
                price: self.price,
            })
    }

    /// Writes a quantity and an amount to a three-cell chapter.
    pub(crate) fn chapter(&mut self, start: usize, quantity: &str, amount: Decimal) {
        self.draft.set(start, quantity);
        self.draft.set(start + 1, amount);
        self.draft.set(start + 2, amount);
    }

    /// Writes the payment chapter when `payment` is nonzero.
    pub(crate) fn payment(&mut self, period: MonthYear, payment: Decimal) {
        if payment.is_zero() {
            return;
        }
        let date = period
            .date_on(PAYMENT_DAY)
            .map(|date| date.format("%d.%m.%Y").to_string());
        let label = if payment > Decimal::ZERO {
            PAYMENT_LABEL
        } else {
            REFUND_LABEL
        };
        self.draft.set(field::PAYMENT_FROM, date.clone());
        self.draft.set(field::PAYMENT_TO, date);
        self.draft.set(field::PAYMENT, payment);
        self.draft.set(field::PAYMENT_KIND, label);
    }
}

/// Reads a ledger amount, treating a missing service row as zero.
pub(crate) fn zero_if_missing(
    lookup: Result<Decimal, LedgerError>,
    account: &str,
    period: MonthYear,
    what: &'static str,
) -> Result<Decimal, RowError> {
    match lookup {
        Ok(amount) => Ok(amount),
        Err(err) if err.is_missing_row() => {
            debug!(account, period = %period, what, "No ledger row, using zero");
            Ok(Decimal::ZERO)
        }
        Err(err) => Err(err.into()),
    }
}
