//! Cycle-date resolution for monthly payment schedules.

use chrono::{Datelike, NaiveDate};

use crate::error::AmortError;
use crate::AmortResult;

/// Resolve the payment date `month_offset` months after `base_date`, landing
/// on `cycle_day` or the last day of the target month when it is shorter.
///
/// Month arithmetic runs on an absolute month index with Euclidean division,
/// so offsets of either sign and any magnitude resolve in constant time. A
/// `cycle_day` of 0 is treated as day 1.
///
/// # Errors
///
/// Returns `AmortError::DateError` only when the target year falls outside
/// the range `chrono::NaiveDate` can represent.
pub fn resolve(
    base_date: NaiveDate,
    month_offset: i64,
    cycle_day: u32,
) -> AmortResult<NaiveDate> {
    let month_index = (i64::from(base_date.year()) * 12 + i64::from(base_date.month0()))
        .saturating_add(month_offset);
    let year = month_index.div_euclid(12);
    let month = (month_index.rem_euclid(12) + 1) as u32;

    let year = i32::try_from(year).map_err(|_| out_of_range(base_date, month_offset))?;
    let day = cycle_day.clamp(1, days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| out_of_range(base_date, month_offset))
}

/// Whole calendar days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Number of days in a given month/year.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month is always derived from rem_euclid(12) + 1"),
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn out_of_range(base_date: NaiveDate, month_offset: i64) -> AmortError {
    AmortError::DateError(format!(
        "{base_date} offset by {month_offset} months is outside the representable date range"
    ))
}
