//! Spreading a lump reaccrual over the months it corrects.

use heatbill_shared::types::{MonthYear, round_cents};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::facts::{ReaccrualEvent, ReaccrualKind};
use crate::ledger::{AccountLedger, GVS_SERVICE, LedgerError};

/// How many months back the walk may look.
pub const MAX_DEPTH: usize = 36;

/// The share of a reaccrual attributed to one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaccrualPart {
    /// Month the share corrects.
    pub period: MonthYear,
    /// Share of the lump, as a magnitude.
    pub amount: Decimal,
}

/// Result of spreading one lump reaccrual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Shares, oldest month first.
    pub parts: Vec<ReaccrualPart>,
    /// False when no spreading matched and the lump was kept whole.
    pub valid: bool,
}

impl Decomposition {
    /// Turns the shares into reaccrual events of one kind.
    #[must_use]
    pub fn into_events(self, kind: Option<ReaccrualKind>) -> Vec<ReaccrualEvent> {
        self.parts
            .into_iter()
            .map(|part| ReaccrualEvent {
                period: part.period,
                amount: part.amount,
                kind,
            })
            .collect()
    }
}

/// Spreads the hot-water reaccrual `total` booked in `booked` over previous months.
///
/// First tries to find consecutive previous months whose accruals the lump
/// cancels exactly. If that fails and the account looks closed (next month's
/// accrual is zero or missing), accepts the first run of months after which
/// the remainder is smaller than the accrual of the month before; the
/// remainder goes to that month. Otherwise the lump is kept whole in `booked`
/// and the result is marked invalid.
///
/// Spread shares are the corrected months' accruals, and the remainder share
/// is its absolute value, so a negative lump yields positive shares. A lump
/// kept whole keeps its sign.
///
/// Months without a ledger row are skipped. Other ledger errors propagate.
pub fn decompose<L>(
    ledger: &L,
    booked: MonthYear,
    total: Decimal,
) -> Result<Decomposition, LedgerError>
where
    L: AccountLedger + ?Sized,
{
    let total = round_cents(total);

    if let Some(parts) = cancel_to_zero(ledger, booked, total)? {
        debug!(
            period = %booked,
            %total,
            months = parts.len(),
            "Reaccrual cancels previous accruals"
        );
        return Ok(Decomposition { parts, valid: true });
    }

    let account_closed = match ledger.accrual(booked.next(), GVS_SERVICE) {
        Ok(next) => next.is_zero(),
        Err(err) if err.is_missing_row() => true,
        Err(err) => return Err(err),
    };

    if account_closed {
        if let Some(parts) = cancel_to_remainder(ledger, booked, total)? {
            debug!(
                period = %booked,
                %total,
                months = parts.len(),
                "Reaccrual spread with remainder"
            );
            return Ok(Decomposition { parts, valid: true });
        }
    }

    warn!(period = %booked, %total, "Could not spread reaccrual over previous months");
    Ok(Decomposition {
        parts: vec![ReaccrualPart {
            period: booked,
            amount: total,
        }],
        valid: false,
    })
}

/// Accrual of `period`, rounded to cents; `None` when the ledger has no row.
fn accrual_at<L>(ledger: &L, period: MonthYear) -> Result<Option<Decimal>, LedgerError>
where
    L: AccountLedger + ?Sized,
{
    match ledger.accrual(period, GVS_SERVICE) {
        Ok(amount) => Ok(Some(round_cents(amount))),
        Err(err) if err.is_missing_row() => Ok(None),
        Err(err) => Err(err),
    }
}

fn cancel_to_zero<L>(
    ledger: &L,
    booked: MonthYear,
    total: Decimal,
) -> Result<Option<Vec<ReaccrualPart>>, LedgerError>
where
    L: AccountLedger + ?Sized,
{
    let mut period = booked;
    let mut running = total;
    let mut parts = Vec::new();

    for _ in 0..MAX_DEPTH {
        period = period.previous();
        let Some(accrual) = accrual_at(ledger, period)? else {
            continue;
        };
        parts.push(ReaccrualPart {
            period,
            amount: accrual,
        });
        running += accrual;
        if running.is_zero() {
            parts.reverse();
            return Ok(Some(parts));
        }
    }
    Ok(None)
}

fn cancel_to_remainder<L>(
    ledger: &L,
    booked: MonthYear,
    total: Decimal,
) -> Result<Option<Vec<ReaccrualPart>>, LedgerError>
where
    L: AccountLedger + ?Sized,
{
    let mut period = booked;
    let mut running = total;
    let mut parts = Vec::new();

    for _ in 0..MAX_DEPTH {
        period = period.previous();
        let (Some(accrual), Some(before)) = (
            accrual_at(ledger, period)?,
            accrual_at(ledger, period.previous())?,
        ) else {
            continue;
        };
        parts.push(ReaccrualPart {
            period,
            amount: accrual,
        });
        running += accrual;
        if running.abs() < before {
            parts.push(ReaccrualPart {
                period: period.previous(),
                amount: running.abs(),
            });
            parts.reverse();
            return Ok(Some(parts));
        }
    }
    Ok(None)
}
