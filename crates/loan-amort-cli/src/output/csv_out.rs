use serde_json::Value;
use std::io;

use super::{format_cell, split_result, tabulate};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                let (scalars, arrays) = split_result(result);
                if let Some((_, rows)) = arrays.first() {
                    // Rows only; scalar totals are dropped
                    write_array_csv(&mut wtr, rows);
                } else {
                    // Two-column CSV: field, value
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in scalars {
                        let _ = wtr.write_record([key, &format_cell(val)]);
                    }
                }
            }
            Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
            _ => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
                }
            }
        },
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    match tabulate(arr) {
        Some((headers, rows)) => {
            let _ = wtr.write_record(&headers);
            for row in rows {
                let _ = wtr.write_record(&row);
            }
        }
        None => {
            for item in arr {
                let _ = wtr.write_record([&format_cell(item)]);
            }
        }
    }
}
