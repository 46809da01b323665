use chrono::NaiveDate;
use loan_amort_core::amortization::summary::FinalRow;
use loan_amort_core::{Money, ScheduleRow};
use std::io;
use std::path::Path;

const SCHEDULE_HEADERS: [&str; 12] = [
    "Loan #",
    "Period",
    "Payment Date",
    "Days",
    "Projected Close Date",
    "Begin Balance",
    "Daily Interest",
    "Interest",
    "Payment",
    "Principal",
    "Extra Interest",
    "End Balance",
];

const FINAL_ROWS_HEADERS: [&str; 21] = [
    "Loan #",
    "First Payment Date",
    "First Payment Days",
    "Projected Close Date",
    "First Begin Balance",
    "First Daily Interest",
    "First Interest",
    "First Payment",
    "First Principal",
    "First Extra Interest",
    "First End Balance",
    "Final Payment Date",
    "Final Payment Days",
    "Final Begin Balance",
    "Final Daily Interest",
    "Final Interest",
    "Final Payment",
    "Final Principal",
    "Final Extra Interest",
    "Final End Balance",
    "Total Interest Paid",
];

/// Write every schedule row to a CSV file.
pub fn export_schedule(path: &Path, rows: &[ScheduleRow]) -> csv::Result<()> {
    write_schedule(csv::Writer::from_path(path)?, rows)
}

/// Write the first/final row summary to a CSV file.
pub fn export_final_rows(path: &Path, finals: &[FinalRow]) -> csv::Result<()> {
    write_final_rows(csv::Writer::from_path(path)?, finals)
}

pub fn write_schedule<W: io::Write>(mut wtr: csv::Writer<W>, rows: &[ScheduleRow]) -> csv::Result<()> {
    wtr.write_record(SCHEDULE_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.loan_number.clone(),
            row.period.to_string(),
            date_cell(Some(row.payment_date)),
            opt_cell(row.days),
            date_cell(row.projected_close_date),
            money_cell(Some(row.beginning_balance)),
            money_cell(row.daily_interest),
            money_cell(row.interest),
            money_cell(row.payment),
            money_cell(row.principal),
            money_cell(row.extra_interest),
            money_cell(Some(row.ending_balance)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_final_rows<W: io::Write>(mut wtr: csv::Writer<W>, finals: &[FinalRow]) -> csv::Result<()> {
    wtr.write_record(FINAL_ROWS_HEADERS)?;
    for fin in finals {
        let first = fin.first.as_ref();
        let last = &fin.last;

        let mut record: Vec<String> = Vec::with_capacity(FINAL_ROWS_HEADERS.len());
        record.push(fin.loan_number.clone());
        record.push(date_cell(first.map(|r| r.payment_date)));
        record.push(opt_cell(first.and_then(|r| r.days)));
        record.push(date_cell(fin.projected_close_date));
        record.extend(money_columns(first));
        record.push(date_cell(Some(last.payment_date)));
        record.push(opt_cell(last.days));
        record.extend(money_columns(Some(last)));
        record.push(money_cell(Some(fin.total_interest_paid)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Begin balance through end balance, blank when the row is absent.
fn money_columns(row: Option<&ScheduleRow>) -> [String; 7] {
    [
        money_cell(row.map(|r| r.beginning_balance)),
        money_cell(row.and_then(|r| r.daily_interest)),
        money_cell(row.and_then(|r| r.interest)),
        money_cell(row.and_then(|r| r.payment)),
        money_cell(row.and_then(|r| r.principal)),
        money_cell(row.and_then(|r| r.extra_interest)),
        money_cell(row.map(|r| r.ending_balance)),
    ]
}

fn money_cell(value: Option<Money>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn date_cell(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
