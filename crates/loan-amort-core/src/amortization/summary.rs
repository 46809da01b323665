//! First/final row summary across a concatenated multi-loan schedule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{round_money, Money, ScheduleRow};

/// One loan's first payment row paired with its last row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRow {
    pub loan_number: String,
    /// Taken from the loan's period 0 row.
    pub projected_close_date: Option<NaiveDate>,
    /// Period 1, absent when the loan has no payment periods.
    pub first: Option<ScheduleRow>,
    /// The last row seen for the loan (period 0 for a zero-length term).
    pub last: ScheduleRow,
    /// Sum of interest over periods 1..N.
    pub total_interest_paid: Money,
}

/// Scan schedule rows (one or many loans, each in period order) and build a
/// summary per loan number, in order of first appearance.
pub fn final_rows(rows: &[ScheduleRow]) -> Vec<FinalRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<FinalRow> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.loan_number.as_str()).or_insert_with(|| {
            summaries.push(FinalRow {
                loan_number: row.loan_number.clone(),
                projected_close_date: None,
                first: None,
                last: row.clone(),
                total_interest_paid: Decimal::ZERO,
            });
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];

        if row.is_snapshot() {
            summary.projected_close_date =
                summary.projected_close_date.or(row.projected_close_date);
        } else if let Some(interest) = row.interest {
            summary.total_interest_paid = summary.total_interest_paid.saturating_add(interest);
        }
        if row.period == 1 && summary.first.is_none() {
            summary.first = Some(row.clone());
        }
        summary.last = row.clone();
    }

    for summary in &mut summaries {
        summary.total_interest_paid = round_money(summary.total_interest_paid);
    }
    summaries
}
