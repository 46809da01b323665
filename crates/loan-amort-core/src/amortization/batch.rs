//! Schedules for a batch of independent loans.
//!
//! Loans share no state, so with the `parallel` feature they are fanned out
//! across the rayon pool. Results are always collected in input order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::schedule::{amortize, in_range, LoanSchedule, ScheduleOptions};
use crate::error::AmortError;
use crate::types::{round_money, with_metadata, ComputationOutput, LoanTerms, Money, ScheduleRow};
use crate::AmortResult;

/// Concatenated schedule rows for every loan in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSchedule {
    pub loan_count: usize,
    pub total_interest_paid: Money,
    pub rows: Vec<ScheduleRow>,
}

/// Build every loan's schedule and concatenate the rows in input order.
pub fn amortize_batch(
    loans: &[LoanTerms],
    options: &ScheduleOptions,
) -> AmortResult<ComputationOutput<BatchSchedule>> {
    let start = Instant::now();

    let outputs = run_each(loans, options)?;

    let mut warnings: Vec<String> = Vec::new();
    let mut rows: Vec<ScheduleRow> = Vec::new();
    let mut total_interest_paid = Decimal::ZERO;
    for output in outputs {
        warnings.extend(output.warnings);
        let LoanSchedule {
            rows: loan_rows,
            total_interest_paid: loan_interest,
            ..
        } = output.result;
        total_interest_paid = in_range(
            total_interest_paid.checked_add(loan_interest),
            "batch total interest",
        )?;
        rows.extend(loan_rows);
    }

    log::debug!("built {} rows for {} loans", rows.len(), loans.len());

    let result = BatchSchedule {
        loan_count: loans.len(),
        total_interest_paid: round_money(total_interest_paid),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Per-loan daily simple interest schedules, concatenated in input order",
        &serde_json::json!({
            "loan_count": loans.len(),
            "interest_start": options.interest_start,
            "strict": options.strict,
            "parallel": cfg!(feature = "parallel"),
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(feature = "parallel")]
fn run_each(
    loans: &[LoanTerms],
    options: &ScheduleOptions,
) -> AmortResult<Vec<ComputationOutput<LoanSchedule>>> {
    loans
        .par_iter()
        .enumerate()
        .map(|(idx, terms)| amortize(terms, options).map_err(|e| locate(idx, e)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_each(
    loans: &[LoanTerms],
    options: &ScheduleOptions,
) -> AmortResult<Vec<ComputationOutput<LoanSchedule>>> {
    loans
        .iter()
        .enumerate()
        .map(|(idx, terms)| amortize(terms, options).map_err(|e| locate(idx, e)))
        .collect()
}

/// Prefix input errors with the position of the offending loan.
fn locate(idx: usize, err: AmortError) -> AmortError {
    match err {
        AmortError::InvalidInput { field, reason } => AmortError::InvalidInput {
            field: format!("loans[{idx}].{field}"),
            reason,
        },
        other => other,
    }
}
