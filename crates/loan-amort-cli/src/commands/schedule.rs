use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use loan_amort_core::amortization::batch::{amortize_batch, BatchSchedule};
use loan_amort_core::amortization::schedule::{InterestStart, ScheduleOptions};
use loan_amort_core::amortization::summary::{self, FinalRow};
use loan_amort_core::{ComputationOutput, LoanTerms};

use crate::input::{self, ColumnMap};
use crate::output::export;

/// Input file used when neither --input nor piped stdin is given
const DEFAULT_INPUT: &str = "loans.csv";

/// Where loans come from and how their schedules are built
#[derive(Args)]
pub struct LoanSource {
    /// Path to a .csv or .json loan file (JSON may also be piped on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// JSON object mapping field names to CSV headers, e.g. '{"loan_number":"Loan #"}'
    #[arg(long)]
    pub columns: Option<String>,

    /// Start interest one month before the first payment instead of the stated date
    #[arg(long)]
    pub derive_interest_start: bool,

    /// Fail on backdated payment dates or negative principal instead of warning
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for building full amortization schedules
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub source: LoanSource,

    /// Also write every schedule row to this CSV file
    #[arg(long)]
    pub schedule_file: Option<PathBuf>,

    /// Also write the per-loan first/final row summary to this CSV file
    #[arg(long)]
    pub final_rows_file: Option<PathBuf>,
}

/// Arguments for the per-loan first/final row summary
#[derive(Args)]
pub struct FinalRowsArgs {
    #[command(flatten)]
    pub source: LoanSource,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_batch(&args.source)?;

    if let Some(ref path) = args.schedule_file {
        export::export_schedule(path, &output.result.rows)?;
        log::info!("wrote {} schedule rows to {}", output.result.rows.len(), path.display());
    }
    if let Some(ref path) = args.final_rows_file {
        let finals = summary::final_rows(&output.result.rows);
        export::export_final_rows(path, &finals)?;
        log::info!("wrote {} final rows to {}", finals.len(), path.display());
    }

    Ok(serde_json::to_value(output)?)
}

pub fn run_final_rows(args: FinalRowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_batch(&args.source)?;
    let finals: Vec<FinalRow> = summary::final_rows(&output.result.rows);

    let ComputationOutput {
        methodology,
        assumptions,
        warnings,
        metadata,
        ..
    } = output;
    Ok(serde_json::to_value(ComputationOutput {
        result: finals,
        methodology,
        assumptions,
        warnings,
        metadata,
    })?)
}

fn build_batch(
    source: &LoanSource,
) -> Result<ComputationOutput<BatchSchedule>, Box<dyn std::error::Error>> {
    let loans = load_loans(source)?;
    let options = ScheduleOptions {
        interest_start: if source.derive_interest_start {
            InterestStart::Derived
        } else {
            InterestStart::Stated
        },
        strict: source.strict,
    };
    Ok(amortize_batch(&loans, &options)?)
}

fn load_loans(source: &LoanSource) -> Result<Vec<LoanTerms>, Box<dyn std::error::Error>> {
    let columns = match source.columns {
        Some(ref text) => ColumnMap::from_json(text)?,
        None => ColumnMap::default(),
    };

    if let Some(ref path) = source.input {
        return Ok(input::file::read_loans(path, &columns)?);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        // A single loan object is accepted as a batch of one
        let loans: Vec<LoanTerms> = match data {
            Value::Array(_) => serde_json::from_value(data)?,
            single => vec![serde_json::from_value(single)?],
        };
        log::info!("loaded {} loans from stdin", loans.len());
        return Ok(loans);
    }
    Ok(input::file::read_loans(DEFAULT_INPUT, &columns)?)
}
