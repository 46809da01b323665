use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use loan_amort_core::calendar;

use crate::input::parse::parse_date;

/// Arguments for resolving a single cycle date
#[derive(Args)]
pub struct ResolveDateArgs {
    /// Base date (YYYY-MM-DD, MM/DD/YYYY or MM/DD/YY)
    #[arg(long, value_parser = parse_date)]
    pub base: NaiveDate,

    /// Months to move forward (negative moves backward)
    #[arg(long, allow_negative_numbers = true)]
    pub months: i64,

    /// Day of month to land on, clamped to the month's length
    #[arg(long)]
    pub cycle_day: u32,
}

pub fn run_resolve_date(args: ResolveDateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let resolved = calendar::resolve(args.base, args.months, args.cycle_day)?;
    Ok(json!({
        "base_date": args.base,
        "month_offset": args.months,
        "cycle_day": args.cycle_day,
        "resolved_date": resolved,
    }))
}
