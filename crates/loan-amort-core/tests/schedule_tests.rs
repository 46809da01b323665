use chrono::{Datelike, Duration, NaiveDate};
use loan_amort_core::amortization::batch::amortize_batch;
use loan_amort_core::amortization::schedule::{
    amortize, build_schedule, build_schedule_with, InterestStart, ScheduleOptions,
};
use loan_amort_core::amortization::summary::final_rows;
use loan_amort_core::calendar::resolve;
use loan_amort_core::{AmortError, LoanTerms, ScheduleRow};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn thirty_year_mortgage() -> LoanTerms {
    LoanTerms {
        loan_number: "MTG-360".into(),
        periods_months: 360,
        projected_close_date: Some(d(2024, 6, 20)),
        interest_start_date: d(2024, 7, 1),
        first_payment_date: d(2024, 8, 1),
        cycle_day: 1,
        annual_rate_percent: dec!(6.875),
        loan_amount: dec!(425000),
        monthly_payment: dec!(2791.95),
    }
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

fn money_fields(row: &ScheduleRow) -> Vec<Decimal> {
    let mut values = vec![row.beginning_balance, row.ending_balance];
    values.extend(
        [
            row.daily_interest,
            row.interest,
            row.payment,
            row.principal,
            row.extra_interest,
        ]
        .into_iter()
        .flatten(),
    );
    values
}

fn assert_schedule_invariants(terms: &LoanTerms, rows: &[ScheduleRow]) {
    let n = terms.periods_months.max(0) as usize;
    assert_eq!(rows.len(), n + 1);

    for (k, row) in rows.iter().enumerate() {
        assert_eq!(row.period as usize, k);
        assert_eq!(row.loan_number, terms.loan_number);
        assert!(row.ending_balance >= Decimal::ZERO, "negative balance at {k}");
        for value in money_fields(row) {
            assert!(value.scale() <= 2, "{value} at period {k} has more than 2 dp");
        }
        if k > 0 {
            let payment = row.payment.unwrap();
            let interest = row.interest.unwrap();
            assert_eq!(row.principal.unwrap(), payment - interest);
            assert!(row.days.is_some());
            assert!(row.projected_close_date.is_none());
            assert!(row.extra_interest.is_none());
        }
    }

    for pair in rows.windows(2) {
        assert_eq!(pair[0].ending_balance, pair[1].beginning_balance);
    }

    if n > 0 {
        let last = rows.last().unwrap();
        assert_eq!(last.ending_balance, dec!(0.00));
        assert_eq!(
            last.payment.unwrap(),
            last.beginning_balance + last.interest.unwrap()
        );
    }
}

#[test]
fn test_thirty_year_mortgage_invariants() {
    let terms = thirty_year_mortgage();
    let rows = build_schedule(&terms).unwrap();

    assert_schedule_invariants(&terms, &rows);
    assert_eq!(rows[360].payment_date, d(2054, 7, 1));
    // 11 days of proration at round(0.06875 * 425000 / 365) = 80.05
    assert_eq!(rows[0].extra_interest, Some(dec!(880.55)));
}

#[test]
fn test_payment_dates_follow_cycle_day() {
    let terms = LoanTerms {
        first_payment_date: d(2024, 1, 31),
        cycle_day: 31,
        periods_months: 24,
        ..thirty_year_mortgage()
    };
    let rows = build_schedule(&terms).unwrap();

    for row in &rows[2..] {
        let expected = resolve(terms.first_payment_date, i64::from(row.period - 1), 31).unwrap();
        assert_eq!(row.payment_date, expected);
    }
    assert_eq!(rows[2].payment_date, d(2024, 2, 29));
    assert_eq!(rows[14].payment_date, d(2025, 2, 28));
}

#[test]
fn test_extra_interest_reference_scenario() {
    let terms = LoanTerms {
        loan_number: "L-EXTRA".into(),
        periods_months: 24,
        projected_close_date: Some(d(2024, 1, 1)),
        interest_start_date: d(2024, 1, 11),
        first_payment_date: d(2024, 2, 1),
        cycle_day: 1,
        annual_rate_percent: dec!(6.00),
        loan_amount: dec!(100000.00),
        monthly_payment: dec!(4432.06),
    };
    let rows = build_schedule(&terms).unwrap();

    assert_eq!(rows[0].extra_interest, Some(dec!(164.40)));
    // 21 days at 16.44 = 345.24, plus the proration
    assert_eq!(rows[1].daily_interest, Some(dec!(16.44)));
    assert_eq!(rows[1].interest, Some(dec!(509.64)));
    assert_eq!(rows[1].payment, Some(dec!(4596.46)));
    assert_schedule_invariants(&terms, &rows);
}

#[test]
fn test_amortize_envelope_carries_methodology() {
    let out = amortize(&thirty_year_mortgage(), &ScheduleOptions::default()).unwrap();

    assert!(out.methodology.contains("365"));
    assert_eq!(out.assumptions["loan_number"], "MTG-360");
    assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(out.result.rows.len(), 361);
}

#[test]
fn test_schedule_serializes_money_as_strings() {
    let rows = build_schedule(&thirty_year_mortgage()).unwrap();
    let value = serde_json::to_value(&rows[0]).unwrap();

    assert_eq!(value["beginning_balance"], "425000.00");
    assert_eq!(value["payment_date"], "2024-07-01");
    assert!(value["interest"].is_null());
}

#[test]
fn test_loan_terms_deserialize_without_close_date() {
    let terms: LoanTerms = serde_json::from_str(
        r#"{
            "loan_number": "J-1",
            "periods_months": 2,
            "interest_start_date": "2024-01-01",
            "first_payment_date": "2024-02-01",
            "cycle_day": 1,
            "annual_rate_percent": "12",
            "loan_amount": "1000",
            "monthly_payment": "600"
        }"#,
    )
    .unwrap();

    assert_eq!(terms.projected_close_date, None);
    let rows = build_schedule(&terms).unwrap();
    assert_schedule_invariants(&terms, &rows);
}

// ===========================================================================
// Options
// ===========================================================================

#[test]
fn test_derived_start_matches_stated_when_dates_agree() {
    let terms = thirty_year_mortgage();
    let derived = build_schedule_with(
        &terms,
        &ScheduleOptions {
            interest_start: InterestStart::Derived,
            strict: false,
        },
    )
    .unwrap();

    // One month before 2024-08-01 is 2024-07-01; close 2024-06-20 is earlier
    assert_eq!(derived[0].payment_date, d(2024, 7, 1));
    assert_eq!(derived, build_schedule(&terms).unwrap());
}

#[test]
fn test_strict_batch_fails_on_backdated_first_payment() {
    let mut backdated = thirty_year_mortgage();
    backdated.loan_number = "BACK".into();
    backdated.first_payment_date = d(2024, 6, 25);

    let loans = vec![thirty_year_mortgage(), backdated];
    let strict = ScheduleOptions {
        strict: true,
        ..Default::default()
    };

    match amortize_batch(&loans, &strict).unwrap_err() {
        AmortError::IrregularSchedule {
            loan_number,
            period,
            ..
        } => {
            assert_eq!(loan_number, "BACK");
            assert_eq!(period, 1);
        }
        other => panic!("Expected IrregularSchedule, got {other:?}"),
    }

    let lenient = amortize_batch(&loans, &ScheduleOptions::default()).unwrap();
    assert_eq!(lenient.warnings.len(), 1);
    assert!(lenient.warnings[0].starts_with("Loan BACK period 1"));
}

#[test]
fn test_final_rows_over_batch() {
    let mut second = thirty_year_mortgage();
    second.loan_number = "MTG-180".into();
    second.periods_months = 180;

    let loans = vec![thirty_year_mortgage(), second];
    let batch = amortize_batch(&loans, &ScheduleOptions::default()).unwrap();
    let summary = final_rows(&batch.result.rows);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].last.period, 360);
    assert_eq!(summary[1].last.period, 180);
    assert_eq!(
        summary[0].total_interest_paid + summary[1].total_interest_paid,
        batch.result.total_interest_paid
    );
}

// ===========================================================================
// Property tests
// ===========================================================================

fn loan_terms_strategy() -> impl Strategy<Value = LoanTerms> {
    (
        1i32..=120,
        0i64..=3000,
        15i64..=45,
        proptest::option::of(-30i64..=30),
        1u32..=31,
        0i64..=2000,
        0i64..=50_000_000,
        0i64..=2_000_000,
    )
        .prop_map(
            |(periods, start_offset, first_gap, close_gap, cycle_day, rate_bp, principal_c, payment_c)| {
                let interest_start = d(2020, 1, 1) + Duration::days(start_offset);
                LoanTerms {
                    loan_number: format!("P-{periods}-{cycle_day}"),
                    periods_months: periods,
                    projected_close_date: close_gap.map(|g| interest_start - Duration::days(g)),
                    interest_start_date: interest_start,
                    first_payment_date: interest_start + Duration::days(first_gap),
                    cycle_day,
                    annual_rate_percent: Decimal::new(rate_bp, 2),
                    loan_amount: Decimal::new(principal_c, 2),
                    monthly_payment: Decimal::new(payment_c, 2),
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_schedule_invariants_hold(terms in loan_terms_strategy()) {
        let rows = build_schedule(&terms).unwrap();
        assert_schedule_invariants(&terms, &rows);
    }

    #[test]
    fn prop_forward_dates_never_warn(terms in loan_terms_strategy()) {
        let out = amortize(&terms, &ScheduleOptions::default()).unwrap();
        prop_assert!(out.warnings.iter().all(|w| !w.contains("precedes")));
    }

    #[test]
    fn prop_resolver_lands_in_target_month(
        offset in -2400i64..=2400,
        cycle_day in 1u32..=31,
        base_day in 0i64..=3650,
    ) {
        let base = d(2015, 1, 1) + Duration::days(base_day);
        let resolved = resolve(base, offset, cycle_day).unwrap();

        let month_index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
        prop_assert_eq!(month_index(resolved) - month_index(base), offset);

        prop_assert!(resolved.day() <= cycle_day);
        if resolved.day() < cycle_day {
            // Clamped: must be the last day of the month
            prop_assert_eq!((resolved + Duration::days(1)).day(), 1);
        }
    }
}
