use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates quoted as percentages (6.00 = 6%), the way loan tapes carry them.
pub type Percent = Decimal;

/// Number of decimal places every money value is carried at.
pub const MONEY_SCALE: u32 = 2;

/// Day-count denominator. Flat 365 regardless of leap years.
pub const DAYS_PER_YEAR: Decimal = dec!(365);

/// Round half-up (midpoint away from zero) to cents and pin the scale at 2,
/// so `164.4` is carried as `164.40`.
pub fn round_money(value: Decimal) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Parameters of a single loan, as supplied by the input boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_number: String,
    /// Term length in whole months. Zero or negative yields only period 0.
    pub periods_months: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_close_date: Option<NaiveDate>,
    pub interest_start_date: NaiveDate,
    pub first_payment_date: NaiveDate,
    /// Nominal day-of-month for payments after the first (1-31).
    pub cycle_day: u32,
    pub annual_rate_percent: Percent,
    /// Original principal.
    pub loan_amount: Money,
    /// Nominal monthly payment.
    pub monthly_payment: Money,
}

/// One period of an amortization schedule.
///
/// Period 0 is the snapshot at the interest start date: it carries the
/// projected close date and extra interest, and leaves the payment columns
/// empty. Periods 1..N are payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub loan_number: String,
    pub period: u32,
    pub payment_date: NaiveDate,
    pub days: Option<i64>,
    pub projected_close_date: Option<NaiveDate>,
    pub beginning_balance: Money,
    pub daily_interest: Option<Money>,
    pub interest: Option<Money>,
    pub payment: Option<Money>,
    pub principal: Option<Money>,
    pub extra_interest: Option<Money>,
    pub ending_balance: Money,
}

impl ScheduleRow {
    pub fn is_snapshot(&self) -> bool {
        self.period == 0
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_half_up_cents".to_string(),
        },
    }
}
