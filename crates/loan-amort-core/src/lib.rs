//! Monthly loan amortization schedules with day-count interest and cent-exact
//! decimal rounding.
//!
//! ```
//! use chrono::NaiveDate;
//! use loan_amort_core::amortization::schedule::build_schedule;
//! use loan_amort_core::LoanTerms;
//! use rust_decimal_macros::dec;
//!
//! let terms = LoanTerms {
//!     loan_number: "L-1001".into(),
//!     periods_months: 12,
//!     projected_close_date: NaiveDate::from_ymd_opt(2024, 1, 1),
//!     interest_start_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
//!     first_payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     cycle_day: 1,
//!     annual_rate_percent: dec!(6.00),
//!     loan_amount: dec!(100000.00),
//!     monthly_payment: dec!(8606.64),
//! };
//!
//! let rows = build_schedule(&terms).unwrap();
//! assert_eq!(rows.len(), 13);
//! assert_eq!(rows[0].extra_interest, Some(dec!(164.40)));
//! assert_eq!(rows[12].ending_balance, dec!(0.00));
//! ```

pub mod amortization;
pub mod calendar;
pub mod error;
pub mod types;

pub use error::AmortError;
pub use types::*;

/// Standard result type for all loan-amort operations
pub type AmortResult<T> = Result<T, AmortError>;
