//! Day-count amortization schedule for a single loan.
//!
//! Interest accrues daily on the beginning balance at `rate / 100 / 365`.
//! Every money value is rounded half-up to cents at the point it is
//! computed, so the recurrence never carries sub-cent residue. The final
//! period pays off exactly whatever balance is left.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{days_between, resolve};
use crate::error::AmortError;
use crate::types::{
    round_money, with_metadata, ComputationOutput, LoanTerms, Money, Percent, ScheduleRow,
    DAYS_PER_YEAR,
};
use crate::AmortResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PERCENT_DIVISOR: Decimal = dec!(100);
const MONEY_ZERO: Money = dec!(0.00);

/// Upper bound on rows reserved ahead of the loop (100 years of payments).
const ROW_CAPACITY_HINT: u32 = 1200;

// ---------------------------------------------------------------------------
// Options / Output Types
// ---------------------------------------------------------------------------

/// How the date interest starts accruing from is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestStart {
    /// Use `interest_start_date` from the loan terms.
    #[default]
    Stated,
    /// One month before the first payment (same day, clamped), or the
    /// projected close date when that is later.
    Derived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOptions {
    #[serde(default)]
    pub interest_start: InterestStart,
    /// Fail the loan on the first negative day span or negative principal
    /// instead of reporting it as a warning.
    #[serde(default)]
    pub strict: bool,
}

/// A loan's full schedule plus the figures most callers want from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub loan_number: String,
    /// The date interest actually started accruing from.
    pub interest_start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_interest: Option<Money>,
    /// Sum of interest over every payment period.
    pub total_interest_paid: Money,
    pub rows: Vec<ScheduleRow>,
}

/// A payment period whose inputs produced a value the recurrence does not
/// defend against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Irregularity {
    pub period: u32,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the ordered schedule rows (period 0 through N) with default options.
pub fn build_schedule(terms: &LoanTerms) -> AmortResult<Vec<ScheduleRow>> {
    build_schedule_with(terms, &ScheduleOptions::default())
}

/// Build the ordered schedule rows (period 0 through N).
pub fn build_schedule_with(
    terms: &LoanTerms,
    options: &ScheduleOptions,
) -> AmortResult<Vec<ScheduleRow>> {
    let (rows, _) = run_schedule(terms, options)?;
    Ok(rows)
}

/// Build a schedule wrapped in the standard output envelope, with one
/// warning per irregular period.
pub fn amortize(
    terms: &LoanTerms,
    options: &ScheduleOptions,
) -> AmortResult<ComputationOutput<LoanSchedule>> {
    let start = Instant::now();

    let (rows, irregularities) = run_schedule(terms, options)?;
    let mut warnings: Vec<String> = Vec::new();
    if terms.loan_number.trim().is_empty() {
        log::warn!("loan number is blank");
        warnings.push(
            "Loan number is blank; its rows share an identifier with every other blank loan"
                .to_string(),
        );
    }
    warnings.extend(
        irregularities
            .iter()
            .map(|irr| format!("Loan {} period {}: {}", terms.loan_number, irr.period, irr.reason)),
    );

    let interest_start_date = rows[0].payment_date;
    let extra_interest = rows[0].extra_interest;
    let total_interest_paid = rows
        .iter()
        .filter_map(|r| r.interest)
        .try_fold(Decimal::ZERO, |acc, interest| acc.checked_add(interest));
    let total_interest_paid = round_money(in_range(total_interest_paid, "total interest paid")?);

    let output = LoanSchedule {
        loan_number: terms.loan_number.clone(),
        interest_start_date,
        extra_interest,
        total_interest_paid,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Daily simple interest, actual days / 365, half-up cent rounding, final-period payoff",
        &serde_json::json!({
            "loan_number": terms.loan_number,
            "periods_months": terms.periods_months,
            "annual_rate_percent": terms.annual_rate_percent.to_string(),
            "loan_amount": terms.loan_amount.to_string(),
            "monthly_payment": terms.monthly_payment.to_string(),
            "interest_start": options.interest_start,
            "strict": options.strict,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Daily interest amount on `balance`, rounded to cents.
///
/// # Errors
///
/// `AmortError::InvalidInput` when rate times balance leaves the decimal range.
pub fn daily_interest(annual_rate_percent: Percent, balance: Money) -> AmortResult<Money> {
    let annual = in_range(
        (annual_rate_percent / PERCENT_DIVISOR).checked_mul(balance),
        "annual interest on the balance",
    )?;
    Ok(round_money(annual / DAYS_PER_YEAR))
}

/// The date interest accrues from under the given policy.
pub fn effective_interest_start(
    terms: &LoanTerms,
    policy: InterestStart,
) -> AmortResult<NaiveDate> {
    match policy {
        InterestStart::Stated => Ok(terms.interest_start_date),
        InterestStart::Derived => {
            let first = terms.first_payment_date;
            let one_month_prior = resolve(first, -1, first.day())?;
            Ok(match terms.projected_close_date {
                Some(close) if close > one_month_prior => close,
                _ => one_month_prior,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Period 0 before its extra interest is known.
struct OpeningSnapshot<'a> {
    terms: &'a LoanTerms,
    interest_start: NaiveDate,
    balance: Money,
}

impl<'a> OpeningSnapshot<'a> {
    fn new(terms: &'a LoanTerms, interest_start: NaiveDate) -> Self {
        Self {
            terms,
            interest_start,
            balance: round_money(terms.loan_amount),
        }
    }

    /// Interest between the projected close and the interest start, or
    /// `None` when no close date was projected.
    fn extra_interest(&self) -> AmortResult<Option<Money>> {
        let Some(close) = self.terms.projected_close_date else {
            return Ok(None);
        };
        let extra_days = days_between(close, self.interest_start).max(0);
        let daily = daily_interest(self.terms.annual_rate_percent, self.balance)?;
        let extra = in_range(daily.checked_mul(Decimal::from(extra_days)), "extra interest")?;
        Ok(Some(round_money(extra)))
    }

    fn finalize(self, extra_interest: Option<Money>) -> ScheduleRow {
        ScheduleRow {
            loan_number: self.terms.loan_number.clone(),
            period: 0,
            payment_date: self.interest_start,
            days: None,
            projected_close_date: self.terms.projected_close_date,
            beginning_balance: self.balance,
            daily_interest: None,
            interest: None,
            payment: None,
            principal: None,
            extra_interest,
            ending_balance: self.balance,
        }
    }
}

fn run_schedule(
    terms: &LoanTerms,
    options: &ScheduleOptions,
) -> AmortResult<(Vec<ScheduleRow>, Vec<Irregularity>)> {
    validate_loan_terms(terms)?;

    let interest_start = effective_interest_start(terms, options.interest_start)?;
    let periods = u32::try_from(terms.periods_months.max(0)).unwrap_or(0);

    // Every payment date must be representable before any row is allocated
    if periods > 0 {
        resolve(
            terms.first_payment_date,
            i64::from(periods - 1),
            terms.cycle_day,
        )?;
    }

    let opening = OpeningSnapshot::new(terms, interest_start);
    let extra_interest = opening.extra_interest()?;
    let mut balance = opening.balance;

    let capacity = periods.min(ROW_CAPACITY_HINT) as usize + 1;
    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(capacity);
    let mut irregularities: Vec<Irregularity> = Vec::new();
    rows.push(opening.finalize(extra_interest));

    let nominal_payment = round_money(terms.monthly_payment);
    let mut previous_date = interest_start;

    for period in 1..=periods {
        let payment_date = if period == 1 {
            terms.first_payment_date
        } else {
            resolve(
                terms.first_payment_date,
                i64::from(period - 1),
                terms.cycle_day,
            )?
        };

        let days = days_between(previous_date, payment_date);
        let daily = daily_interest(terms.annual_rate_percent, balance)?;
        let mut interest =
            round_money(in_range(daily.checked_mul(Decimal::from(days)), "period interest")?);
        let mut payment = nominal_payment;

        // Extra interest is folded into the first payment, not disbursed separately
        if period == 1 {
            if let Some(extra) = extra_interest {
                interest = round_money(in_range(interest.checked_add(extra), "period interest")?);
                payment = in_range(payment.checked_add(extra), "first payment")?;
            }
        }

        let payoff = in_range(balance.checked_add(interest), "payoff amount")?;
        if period == periods || payment > payoff {
            payment = payoff;
        }

        let principal = in_range(payment.checked_sub(interest), "principal")?;
        let mut ending_balance =
            round_money(in_range(balance.checked_sub(principal), "ending balance")?);
        if ending_balance < Decimal::ZERO {
            ending_balance = MONEY_ZERO;
        }

        if days < 0 {
            irregularities.push(Irregularity {
                period,
                reason: format!(
                    "payment date {payment_date} precedes previous date {previous_date} \
                     ({days} days); accrued interest is {interest}"
                ),
            });
        }
        if principal < Decimal::ZERO {
            irregularities.push(Irregularity {
                period,
                reason: format!(
                    "payment {payment} is below accrued interest {interest}; \
                     principal is {principal}"
                ),
            });
        }

        rows.push(ScheduleRow {
            loan_number: terms.loan_number.clone(),
            period,
            payment_date,
            days: Some(days),
            projected_close_date: None,
            beginning_balance: balance,
            daily_interest: Some(daily),
            interest: Some(interest),
            payment: Some(payment),
            principal: Some(principal),
            extra_interest: None,
            ending_balance,
        });

        balance = ending_balance;
        previous_date = payment_date;
    }

    for irr in &irregularities {
        log::warn!("loan {} period {}: {}", terms.loan_number, irr.period, irr.reason);
    }
    if options.strict {
        if let Some(first) = irregularities.first() {
            return Err(AmortError::IrregularSchedule {
                loan_number: terms.loan_number.clone(),
                period: first.period,
                reason: first.reason.clone(),
            });
        }
    }

    log::debug!(
        "built schedule for loan {}: {} payment periods from {}",
        terms.loan_number,
        periods,
        interest_start
    );

    Ok((rows, irregularities))
}

/// Map a checked decimal operation that left the 96-bit range to an error.
pub(crate) fn in_range(value: Option<Decimal>, what: &str) -> AmortResult<Decimal> {
    value.ok_or_else(|| AmortError::InvalidInput {
        field: "loan_amount".into(),
        reason: format!("{what} exceeds the representable decimal range"),
    })
}

fn validate_loan_terms(terms: &LoanTerms) -> AmortResult<()> {
    if !(1..=31).contains(&terms.cycle_day) {
        return Err(AmortError::InvalidInput {
            field: "cycle_day".into(),
            reason: format!("Cycle day must be between 1 and 31, got {}", terms.cycle_day),
        });
    }
    if terms.annual_rate_percent < Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if terms.loan_amount < Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative".into(),
        });
    }
    if terms.monthly_payment < Decimal::ZERO {
        return Err(AmortError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Monthly payment cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
