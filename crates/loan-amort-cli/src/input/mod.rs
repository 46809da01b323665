pub mod file;
pub mod parse;
pub mod stdin;

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading loan terms at the file/stdin boundary.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Unsupported input format '{0}': expected a .csv or .json file")]
    UnsupportedFormat(String),

    #[error("Missing column '{column}' (mapped from field '{field}')")]
    MissingColumn { field: String, column: String },

    #[error("Row {row}, column '{column}': cannot parse '{value}': {reason}")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported date format: '{0}' (expected YYYY-MM-DD, MM/DD/YYYY or MM/DD/YY)")]
    UnsupportedDateFormat(String),

    #[error("Invalid column map: {0}")]
    InvalidColumnMap(String),

    #[error("Failed to parse JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header name for each loan field in a tabular input file.
///
/// Every entry defaults to the field's own name, so a `--columns` override only
/// needs to list the headers that differ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub loan_number: String,
    pub periods_months: String,
    pub projected_close_date: String,
    pub interest_start_date: String,
    pub first_payment_date: String,
    pub cycle_day: String,
    pub annual_rate_percent: String,
    pub loan_amount: String,
    pub monthly_payment: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            loan_number: "loan_number".into(),
            periods_months: "periods_months".into(),
            projected_close_date: "projected_close_date".into(),
            interest_start_date: "interest_start_date".into(),
            first_payment_date: "first_payment_date".into(),
            cycle_day: "cycle_day".into(),
            annual_rate_percent: "annual_rate_percent".into(),
            loan_amount: "loan_amount".into(),
            monthly_payment: "monthly_payment".into(),
        }
    }
}

impl ColumnMap {
    /// Parse a JSON object of `field -> header` overrides.
    pub fn from_json(text: &str) -> Result<Self, InputError> {
        serde_json::from_str(text).map_err(|e| InputError::InvalidColumnMap(e.to_string()))
    }

    /// `(field, header)` pairs in canonical field order.
    pub fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("loan_number", self.loan_number.as_str()),
            ("periods_months", self.periods_months.as_str()),
            ("projected_close_date", self.projected_close_date.as_str()),
            ("interest_start_date", self.interest_start_date.as_str()),
            ("first_payment_date", self.first_payment_date.as_str()),
            ("cycle_day", self.cycle_day.as_str()),
            ("annual_rate_percent", self.annual_rate_percent.as_str()),
            ("loan_amount", self.loan_amount.as_str()),
            ("monthly_payment", self.monthly_payment.as_str()),
        ]
    }
}
