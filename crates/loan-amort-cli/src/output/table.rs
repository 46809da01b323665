use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_object, format_cell, split_result, tabulate};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            let (scalars, arrays) = split_result(res_map);
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in scalars {
                    builder.push_record([key.to_string(), format_cell(val)]);
                }
                println!("{}", Table::from(builder));
            }
            for (key, rows) in arrays {
                println!("\n{}:", key);
                print_array_table(rows);
            }
        }
        Value::Array(rows) => print_array_table(rows),
        _ => print_flat_object(envelope),
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_object(map) {
        builder.push_record([key, format_cell(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    match tabulate(arr) {
        Some((headers, rows)) => {
            let mut builder = Builder::default();
            builder.push_record(headers);
            for row in rows {
                builder.push_record(row);
            }
            println!("{}", Table::from(builder));
        }
        None => {
            // Simple array of values
            for item in arr {
                println!("{}", format_cell(item));
            }
        }
    }
}
