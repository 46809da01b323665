use csv::StringRecord;
use loan_amort_core::LoanTerms;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::parse::{parse_date, parse_decimal, parse_int, parse_optional_date};
use super::{ColumnMap, InputError};

/// Read loan terms from a `.csv` or `.json` file, chosen by extension.
pub fn read_loans(path: &str, columns: &ColumnMap) -> Result<Vec<LoanTerms>, InputError> {
    let canonical = resolve_path(path)?;
    let extension = canonical
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let loans = match extension.as_str() {
        "csv" => read_loans_csv(fs::File::open(&canonical)?, columns)?,
        "json" => read_json(path)?,
        _ => return Err(InputError::UnsupportedFormat(canonical.display().to_string())),
    };
    log::info!("loaded {} loans from {}", loans.len(), canonical.display());
    Ok(loans)
}

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, InputError> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)?;
    serde_json::from_str(&contents).map_err(|source| InputError::Json {
        origin: canonical.display().to_string(),
        source,
    })
}

/// Read loan rows from CSV with a header row. Cells are located through the
/// column map and parsed from trimmed text.
pub fn read_loans_csv<R: Read>(reader: R, columns: &ColumnMap) -> Result<Vec<LoanTerms>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let header_index: HashMap<&str, usize> =
        headers.iter().enumerate().map(|(i, h)| (h, i)).collect();

    let mut index: HashMap<&'static str, usize> = HashMap::new();
    for (field, column) in columns.entries() {
        let idx = header_index
            .get(column)
            .copied()
            .ok_or_else(|| InputError::MissingColumn {
                field: field.to_string(),
                column: column.to_string(),
            })?;
        index.insert(field, idx);
    }

    let mut loans = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        // Header is line 1
        let cells = Cells {
            record: &record,
            index: &index,
            columns,
            row: i + 2,
        };
        loans.push(cells.loan_terms()?);
    }
    Ok(loans)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, InputError> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(InputError::FileNotFound(canonical));
    }

    if !canonical.is_file() {
        return Err(InputError::NotAFile(canonical));
    }

    Ok(canonical)
}

// ---------------------------------------------------------------------------
// CSV cell access
// ---------------------------------------------------------------------------

struct Cells<'a> {
    record: &'a StringRecord,
    index: &'a HashMap<&'static str, usize>,
    columns: &'a ColumnMap,
    row: usize,
}

impl Cells<'_> {
    fn loan_terms(&self) -> Result<LoanTerms, InputError> {
        Ok(LoanTerms {
            loan_number: self.text("loan_number").to_string(),
            periods_months: self.parse("periods_months", parse_int)?,
            projected_close_date: self.date("projected_close_date", parse_optional_date)?,
            interest_start_date: self.date("interest_start_date", parse_date)?,
            first_payment_date: self.date("first_payment_date", parse_date)?,
            cycle_day: self.parse("cycle_day", parse_int)?,
            annual_rate_percent: self.parse("annual_rate_percent", parse_decimal)?,
            loan_amount: self.parse("loan_amount", parse_decimal)?,
            monthly_payment: self.parse("monthly_payment", parse_decimal)?,
        })
    }

    fn text(&self, field: &str) -> &str {
        self.index
            .get(field)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    fn parse<T>(&self, field: &str, parser: fn(&str) -> Result<T, String>) -> Result<T, InputError> {
        let value = self.text(field);
        parser(value).map_err(|reason| self.invalid(field, value, reason))
    }

    fn date<T>(
        &self,
        field: &str,
        parser: fn(&str) -> Result<T, InputError>,
    ) -> Result<T, InputError> {
        let value = self.text(field);
        parser(value).map_err(|e| self.invalid(field, value, e.to_string()))
    }

    fn invalid(&self, field: &str, value: &str, reason: String) -> InputError {
        let column = self
            .columns
            .entries()
            .into_iter()
            .find(|(f, _)| *f == field)
            .map_or(field, |(_, c)| c)
            .to_string();
        InputError::InvalidField {
            row: self.row,
            column,
            value: value.to_string(),
            reason,
        }
    }
}
