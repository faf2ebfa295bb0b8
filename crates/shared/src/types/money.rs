//! Decimal helpers for billed amounts and consumption quantities.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Everything here works on `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits in a reported quantity.
pub const QUANTITY_SCALE: u32 = 4;

/// Number of fractional digits in a money amount.
pub const MONEY_SCALE: u32 = 2;

/// Computes `amount / price` rounded half-to-even to four fractional digits.
///
/// The result always carries a scale of exactly four, so `3` comes back as
/// `3.0000`. Returns `None` when `price` is zero.
#[must_use]
pub fn quantity(amount: Decimal, price: Decimal) -> Option<Decimal> {
    let mut value = amount
        .checked_div(price)?
        .round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointNearestEven);
    value.rescale(QUANTITY_SCALE);
    Some(value)
}

/// Renders a quantity with exactly four fractional digits.
#[must_use]
pub fn format_quantity(value: Decimal) -> String {
    let mut value =
        value.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::MidpointNearestEven);
    value.rescale(QUANTITY_SCALE);
    value.to_string()
}

/// Quantizes an amount to cents, half-to-even.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_exact_division() {
        let q = quantity(dec!(150.00), dec!(50.00)).unwrap();
        assert_eq!(q, dec!(3));
        assert_eq!(q.to_string(), "3.0000");
    }

    #[test]
    fn test_quantity_rounds_to_four_digits() {
        let q = quantity(dec!(1000.00), dec!(3217.63)).unwrap();
        assert_eq!(q.to_string(), "0.3108");
    }

    #[test]
    fn test_quantity_midpoint_rounds_to_even() {
        assert_eq!(quantity(dec!(0.00005), dec!(1)).unwrap().to_string(), "0.0000");
        assert_eq!(quantity(dec!(0.00015), dec!(1)).unwrap().to_string(), "0.0002");
    }

    #[test]
    fn test_quantity_negative_amount() {
        let q = quantity(dec!(-150.00), dec!(50.00)).unwrap();
        assert_eq!(q.to_string(), "-3.0000");
    }

    #[test]
    fn test_quantity_zero_price() {
        assert!(quantity(dec!(10), Decimal::ZERO).is_none());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(dec!(2.5)), "2.5000");
        assert_eq!(format_quantity(dec!(0)), "0.0000");
        assert_eq!(format_quantity(dec!(1.23456)), "1.2346");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(10.125)), dec!(10.12));
        assert_eq!(round_cents(dec!(10.135)), dec!(10.14));
        assert_eq!(round_cents(dec!(-3.3333)), dec!(-3.33));
    }
}
