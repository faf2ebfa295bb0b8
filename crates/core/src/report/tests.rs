//! Property-based tests for report rows.

use heatbill_shared::types::MonthYear;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::facts::{AccrualFact, AddressFact, MeteringFact, ReaccrualEvent, ReaccrualKind};
use crate::ledger::{AccountDetails, AccountDetailsRecord, GVS_SERVICE, HEATING_SERVICE};
use crate::roster::YearlyAddressRoster;
use crate::tariff::Tariff;

/// Columns no row kind ever writes.
const NEVER_WRITTEN: [usize; 8] = [17, 18, 29, 34, 38, 39, 44, 46];

const ACCOUNT: &str = "100000000001";

struct FixedPrice(Decimal);

impl Tariff for FixedPrice {
    fn price(&self, _period: MonthYear) -> Option<Decimal> {
        Some(self.0)
    }
}

fn my(month: u32, year: i32) -> MonthYear {
    MonthYear::new(month, year).unwrap()
}

fn address() -> AddressFact {
    AddressFact {
        account: ACCOUNT.to_string(),
        address: "ул Ленина 5, кв 12".to_string(),
        population: 2,
    }
}

fn ledger_row(
    period: MonthYear,
    service: &str,
    payment: Decimal,
    closing: Decimal,
) -> AccountDetailsRecord {
    AccountDetailsRecord {
        year: period.year(),
        month: period.month(),
        service: service.to_string(),
        opening_balance: Decimal::ZERO,
        accrual: Decimal::ZERO,
        reaccrual: Decimal::ZERO,
        payment,
        closing_balance: closing,
    }
}

fn full_ledger(period: MonthYear) -> AccountDetails {
    AccountDetails::new(
        ACCOUNT,
        vec![
            ledger_row(period, HEATING_SERVICE, dec!(100.00), dec!(12.00)),
            ledger_row(period, GVS_SERVICE, dec!(80.00), dec!(-4.00)),
        ],
    )
}

fn metered(counter_id: &str) -> MeteringFact {
    MeteringFact {
        account: ACCOUNT.to_string(),
        counter_id: Some(counter_id.to_string()),
        metric_current: Some(dec!(120.5)),
        metric_date_current: Some("25.05.2023".to_string()),
        consumption_ipu: Some(dec!(3.0)),
        ..MeteringFact::default()
    }
}

fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind() -> impl Strategy<Value = ReaccrualKind> {
    prop_oneof![
        Just(ReaccrualKind::Meter),
        Just(ReaccrualKind::Average),
        Just(ReaccrualKind::Normative),
    ]
}

fn metering_fact() -> impl Strategy<Value = MeteringFact> {
    (
        any::<bool>(),
        prop::option::of(0i64..1000),
        prop::option::of(0i64..1000),
        prop::option::of(0i64..1000),
    )
        .prop_map(|(with_counter, ipu, average, norm)| MeteringFact {
            account: ACCOUNT.to_string(),
            counter_id: with_counter.then(|| "A7".to_string()),
            metric_current: with_counter.then_some(dec!(10)),
            metric_date_current: with_counter.then(|| "20.03.2022".to_string()),
            consumption_ipu: ipu.map(|v| Decimal::new(v, 1)),
            consumption_average: average.map(|v| Decimal::new(v, 1)),
            consumption_normative: norm.map(|v| Decimal::new(v, 1)),
            people_registered: Some(1),
            ..MeteringFact::default()
        })
}

fn has_four_decimals(cell: &Cell) -> bool {
    cell.as_text()
        .and_then(|text| text.split_once('.'))
        .is_some_and(|(_, fraction)| {
            fraction.len() == 4 && fraction.chars().all(|c| c.is_ascii_digit())
        })
}

fn assert_shape(row: &ReportRow) {
    assert_eq!(row.len(), FIELD_COUNT);
    for index in NEVER_WRITTEN {
        assert!(row.get(index).is_empty(), "column {index} written");
    }
}

proptest! {
    /// Every hot-water row has 47 cells, leaves the unused columns empty,
    /// and reports a four-decimal quantity equal to amount / price.
    #[test]
    fn test_gvs_row_shape_and_quantity(
        gvs in amount(),
        price in price(),
        metering in metering_fact(),
    ) {
        let address = address();
        let tariff = FixedPrice(price);
        let ctx = RowContext::new(my(3, 2022), &address, &tariff);
        let accrual = AccrualFact { gvs, ..AccrualFact::default() };
        let mut memo = InstallDateMemo::default();

        let row = gvs_row(&ctx, &accrual, &metering, &full_ledger(my(3, 2022)), &mut memo).unwrap();

        assert_shape(&row);
        prop_assert!(has_four_decimals(row.get(field::TOTAL_QUANTITY)));
        let expected = heatbill_shared::types::quantity(gvs, price).unwrap().to_string();
        prop_assert_eq!(row.get(field::TOTAL_QUANTITY).as_text(), Some(expected.as_str()));
        prop_assert_eq!(row.get(field::METER_QUANTITY).is_empty(), !metering.billed_by_meter());
        prop_assert_eq!(row.get(field::AVERAGE_QUANTITY).is_empty(), !metering.billed_by_average());
        prop_assert_eq!(row.get(field::NORM_QUANTITY).is_empty(), !metering.billed_by_norm());
    }

    /// A heating row fills exactly one of the average and normative chapters.
    #[test]
    fn test_heating_average_and_norm_are_exclusive(
        heating in amount(),
        price in price(),
        has_meter in any::<bool>(),
        has_average in any::<bool>(),
    ) {
        let address = address();
        let tariff = FixedPrice(price);
        let ctx = RowContext::new(my(5, 2023), &address, &tariff);
        let listed = YearlyAddressRoster::new("listed").with_year(2023, ["ул ленина 5"]);
        let unlisted = YearlyAddressRoster::new("unlisted").with_year(2023, ["ул мира 1"]);
        let rosters = HeatingRosters {
            area_meters: if has_meter { &listed } else { &unlisted },
            averages: if has_average { &listed } else { &unlisted },
        };
        let accrual = AccrualFact { heating, ..AccrualFact::default() };

        let row = heating_row(&ctx, &accrual, rosters, &full_ledger(my(5, 2023))).unwrap();

        assert_shape(&row);
        let average = !row.get(field::AVERAGE_QUANTITY).is_empty();
        let norm = !row.get(field::NORM_QUANTITY).is_empty();
        prop_assert!(average != norm);
        prop_assert_eq!(average, has_meter && has_average);
        prop_assert!(has_four_decimals(row.get(field::TOTAL_QUANTITY)));
    }

    /// A reaccrual row fills exactly the chapter of its kind and never the
    /// resident count.
    #[test]
    fn test_reaccrual_fills_exactly_one_chapter(
        amount in amount(),
        price in price(),
        kind in kind(),
        metering in metering_fact(),
    ) {
        let address = address();
        let tariff = FixedPrice(price);
        let ctx = RowContext::new(my(6, 2022), &address, &tariff);
        let event = ReaccrualEvent { period: my(2, 2022), amount, kind: Some(kind) };
        let mut memo = InstallDateMemo::default();

        let row = gvs_reaccrual_row(&ctx, &metering, &event, &mut memo).unwrap();

        assert_shape(&row);
        let chapters = [field::METER_QUANTITY, field::AVERAGE_QUANTITY, field::NORM_QUANTITY];
        let filled: Vec<usize> = chapters
            .into_iter()
            .filter(|index| !row.get(*index).is_empty())
            .collect();
        let expected = match kind {
            ReaccrualKind::Meter => field::METER_QUANTITY,
            ReaccrualKind::Average => field::AVERAGE_QUANTITY,
            ReaccrualKind::Normative => field::NORM_QUANTITY,
        };
        prop_assert_eq!(filled, vec![expected]);
        prop_assert!(row.get(field::POPULATION).is_empty());
        prop_assert!(row.get(field::PAYMENT).is_empty());
        prop_assert!(row.get(field::CLOSING_BALANCE).is_empty());
        prop_assert_eq!(&*row.get(field::ACCRUAL_MONTH), &Cell::Int(2));
    }

    /// The opening row of a meter replacement carries no amounts.
    #[test]
    fn test_opening_row_has_no_amounts(price in price()) {
        let address = address();
        let tariff = FixedPrice(price);
        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let mut memo = InstallDateMemo::default();

        let row = gvs_opening_row(&ctx, &metered("B2"), &mut memo).unwrap();

        assert_shape(&row);
        for index in field::METER_QUANTITY..=field::CLOSING_BALANCE {
            prop_assert!(row.get(index).is_empty(), "column {} written", index);
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_metered_gvs_row_example() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(5, 2023), &address, &tariff);
        let accrual = AccrualFact {
            gvs: dec!(150.00),
            ..AccrualFact::default()
        };
        let mut memo = InstallDateMemo::default();

        let row = gvs_row(&ctx, &accrual, &metered("X9"), &full_ledger(my(5, 2023)), &mut memo)
            .unwrap();

        let record = row.to_record();
        assert_eq!(record[field::RECORD_TYPE], "GVS_ACCURAL");
        assert_eq!(record[field::SERVICE], "Тепловая энергия ГВС");
        assert_eq!(record[field::PRICE], "50.00");
        assert_eq!(record[field::METER_CATEGORY], "Индивидуальный");
        assert_eq!(record[field::METER_INSTALLED], "01.01.2019");
        assert_eq!(record[field::METER_MODEL], "СГВ-15");
        assert_eq!(record[field::METER_NUMBER], "X9_2");
        assert_eq!(record[field::READING_DATE], "25.05.2023");
        assert_eq!(record[field::READING_SOURCE], "От абонента (прочие)");
        assert_eq!(record[field::READING], "120.5");
        assert_eq!(record[field::METER_CONSUMPTION], "3.0");
        assert_eq!(record[field::METER_QUANTITY], "3.0000");
        assert_eq!(record[field::METER_SUM], "150.00");
        assert_eq!(record[field::METER_SUM_DUP], "150.00");
        assert_eq!(record[field::TOTAL_QUANTITY], "3.0000");
        assert_eq!(record[field::TOTAL_SUM], "150.00");
        assert_eq!(record[field::TOTAL_SUM_DUP], "150.00");
        assert_eq!(record[field::PAYMENT_FROM], "20.05.2023");
        assert_eq!(record[field::PAYMENT], "80.00");
        assert_eq!(record[field::PAYMENT_KIND], "Оплата");
        assert_eq!(record[field::CLOSING_BALANCE], "-4.00");
        assert_eq!(memo.fallback_count(), 1);
    }

    #[test]
    fn test_gvs_without_ledger_row_uses_zero() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(5, 2023), &address, &tariff);
        let accrual = AccrualFact {
            gvs: dec!(100.00),
            ..AccrualFact::default()
        };
        let mut memo = InstallDateMemo::default();
        let ledger = AccountDetails::new(ACCOUNT, vec![]);

        let row =
            gvs_row(&ctx, &accrual, &MeteringFact::empty(ACCOUNT), &ledger, &mut memo).unwrap();

        assert!(row.get(field::PAYMENT).is_empty());
        assert_eq!(row.get(field::CLOSING_BALANCE).as_amount(), Some(Decimal::ZERO));
        assert!(row.get(field::METER_CATEGORY).is_empty());
        assert_eq!(row.get(field::TOTAL_QUANTITY).as_text(), Some("2.0000"));
    }

    #[test]
    fn test_gvs_duplicate_ledger_rows_fail() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(5, 2023), &address, &tariff);
        let ledger = AccountDetails::new(
            ACCOUNT,
            vec![
                ledger_row(my(5, 2023), GVS_SERVICE, dec!(1), dec!(0)),
                ledger_row(my(5, 2023), GVS_SERVICE, dec!(2), dec!(0)),
            ],
        );
        let mut memo = InstallDateMemo::default();

        let err = gvs_row(&ctx, &AccrualFact::default(), &metered("X9"), &ledger, &mut memo)
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_SERVICE_ROW");
    }

    #[test]
    fn test_split_rows_record_install_date() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let accrual = AccrualFact {
            gvs: dec!(150.00),
            ..AccrualFact::default()
        };
        let ledger = full_ledger(my(4, 2022));
        let mut memo = InstallDateMemo::default();
        let removed = MeteringFact {
            counter_number: Some("OLD-1".to_string()),
            metric_date_current: Some("10.04.2022".to_string()),
            ..metered("OLD")
        };
        let installed = MeteringFact {
            counter_number: Some("NEW-1".to_string()),
            metric_current: Some(dec!(0)),
            metric_date_current: Some("11.04.2022".to_string()),
            ..metered("NEW")
        };

        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let rows = gvs_rows(&ctx, &accrual, &[removed, installed], &ledger, &mut memo).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(field::METER_NUMBER).as_text(), Some("OLD-1"));
        assert_eq!(rows[0].get(field::READING_SOURCE).as_text(), Some("При снятии прибора"));
        assert_eq!(rows[0].get(field::METER_INSTALLED).as_text(), Some("01.01.2019"));
        assert_eq!(rows[0].get(field::TOTAL_SUM).as_amount(), Some(dec!(150.00)));

        assert_eq!(rows[1].get(field::METER_NUMBER).as_text(), Some("NEW-1"));
        assert_eq!(rows[1].get(field::READING_SOURCE).as_text(), Some("При установке"));
        assert_eq!(rows[1].get(field::METER_INSTALLED).as_text(), Some("11.04.2022"));
        assert!(rows[1].get(field::TOTAL_SUM).is_empty());
        assert_eq!(memo.recorded(ACCOUNT), Some("11.04.2022"));

        // The next period's row reads the recorded date.
        let ctx = RowContext::new(my(5, 2022), &address, &tariff);
        let next = gvs_row(&ctx, &accrual, &metered("NEW"), &full_ledger(my(5, 2022)), &mut memo)
            .unwrap();
        assert_eq!(next.get(field::METER_INSTALLED).as_text(), Some("11.04.2022"));
    }

    #[test]
    fn test_opening_row_is_built_without_ledger_lookups() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let mut memo = InstallDateMemo::default();
        let installed = MeteringFact {
            metric_date_current: Some("11.04.2022".to_string()),
            ..metered("NEW")
        };

        let row = gvs_opening_row(&ctx, &installed, &mut memo).unwrap();

        assert_eq!(row.get(field::PRICE).as_amount(), Some(dec!(50.00)));
        assert_eq!(row.get(field::METER_NUMBER).as_text(), Some("NEW_2"));
        assert_eq!(row.get(field::METER_INSTALLED).as_text(), Some("11.04.2022"));
        assert_eq!(row.get(field::READING_SOURCE).as_text(), Some("При установке"));
        assert_eq!(row.get(field::METER_CONSUMPTION).as_amount(), Some(dec!(3.0)));
        assert!(row.get(field::PAYMENT_KIND).is_empty());
        assert!(row.get(field::CLOSING_BALANCE).is_empty());
        assert_eq!(memo.recorded(ACCOUNT), Some("11.04.2022"));
    }

    #[test]
    fn test_more_than_two_facts_use_first_and_last() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let facts = [metered("A"), metered("B"), metered("C")];
        let mut memo = InstallDateMemo::default();

        let ledger = full_ledger(my(4, 2022));
        let rows = gvs_rows(&ctx, &AccrualFact::default(), &facts, &ledger, &mut memo).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(field::METER_NUMBER).as_text(), Some("A_2"));
        assert_eq!(rows[1].get(field::METER_NUMBER).as_text(), Some("C_2"));
    }

    #[test]
    fn test_no_metering_facts_give_no_rows() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let mut memo = InstallDateMemo::default();

        let ledger = full_ledger(my(4, 2022));
        let rows = gvs_rows(&ctx, &AccrualFact::default(), &[], &ledger, &mut memo).unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_out_of_order_period_is_rejected() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let mut memo = InstallDateMemo::default();
        let accrual = AccrualFact::default();
        let fact = metered("X9");

        let ctx = RowContext::new(my(5, 2022), &address, &tariff);
        gvs_row(&ctx, &accrual, &fact, &full_ledger(my(5, 2022)), &mut memo).unwrap();
        let ctx = RowContext::new(my(4, 2022), &address, &tariff);
        let err = gvs_row(&ctx, &accrual, &fact, &full_ledger(my(4, 2022)), &mut memo).unwrap_err();

        assert_eq!(err.error_code(), "OUT_OF_ORDER_PERIOD");
    }

    #[test]
    fn test_reaccrual_row_example() {
        let address = address();
        let tariff = FixedPrice(dec!(3589.02));
        let ctx = RowContext::new(my(9, 2022), &address, &tariff);
        let event = ReaccrualEvent {
            period: my(7, 2022),
            amount: dec!(-358.90),
            kind: Some(ReaccrualKind::Average),
        };
        let mut memo = InstallDateMemo::default();

        let row = gvs_reaccrual_row(&ctx, &metered("X9"), &event, &mut memo).unwrap();

        assert_eq!(row.record_type(), RecordType::GvsReaccural);
        assert_eq!(*row.get(field::REPORT_MONTH), Cell::Int(9));
        assert_eq!(*row.get(field::ACCRUAL_MONTH), Cell::Int(7));
        assert_eq!(*row.get(field::ACCRUAL_YEAR), Cell::Int(2022));
        assert_eq!(row.get(field::PRICE).as_amount(), Some(dec!(3589.02)));
        assert_eq!(row.get(field::METER_NUMBER).as_text(), Some("X9_2"));
        assert!(row.get(field::READING).is_empty());
        assert!(row.get(field::METER_CONSUMPTION).is_empty());
        assert_eq!(row.get(field::AVERAGE_QUANTITY).as_text(), Some("-0.1000"));
        assert_eq!(row.get(field::AVERAGE_SUM).as_amount(), Some(dec!(-358.90)));
        assert_eq!(row.get(field::TOTAL_QUANTITY).as_text(), Some("-0.1000"));
    }

    #[test]
    fn test_unresolved_reaccrual_kind_is_fatal() {
        let address = address();
        let tariff = FixedPrice(dec!(50.00));
        let ctx = RowContext::new(my(9, 2022), &address, &tariff);
        let event = ReaccrualEvent {
            period: my(7, 2022),
            amount: dec!(10),
            kind: None,
        };
        let mut memo = InstallDateMemo::default();

        let err = gvs_reaccrual_row(&ctx, &MeteringFact::empty(ACCOUNT), &event, &mut memo)
            .unwrap_err();

        assert_eq!(
            err,
            RowError::UnresolvedReaccrualKind {
                account: ACCOUNT.to_string(),
                period: my(7, 2022),
            }
        );
        assert!(!err.is_skippable());
    }

    #[test]
    fn test_non_positive_tariff_is_rejected() {
        let address = address();
        let tariff = FixedPrice(Decimal::ZERO);
        let ctx = RowContext::new(my(9, 2022), &address, &tariff);
        let mut memo = InstallDateMemo::default();

        let err = gvs_row(
            &ctx,
            &AccrualFact::default(),
            &MeteringFact::empty(ACCOUNT),
            &full_ledger(my(9, 2022)),
            &mut memo,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TARIFF");
    }

    #[test]
    fn test_resolve_counter_number() {
        let (number, normalized) = resolve_counter_number(&metered("X9"));
        assert_eq!(number.as_deref(), Some("X9_2"));
        assert_eq!(normalized.counter_number.as_deref(), Some("X9_2"));

        let with_number = MeteringFact {
            counter_number: Some("SN-77".to_string()),
            ..metered("X9")
        };
        let (number, normalized) = resolve_counter_number(&with_number);
        assert_eq!(number.as_deref(), Some("SN-77"));
        assert_eq!(normalized, with_number);

        let (number, normalized) = resolve_counter_number(&MeteringFact::empty(ACCOUNT));
        assert_eq!(number, None);
        assert_eq!(normalized.counter_number, None);
    }
}
