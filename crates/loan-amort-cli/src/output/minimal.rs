use serde_json::Value;

use super::format_cell;

/// Priority list of key output fields
const PRIORITY_KEYS: [&str; 3] = ["total_interest_paid", "resolved_date", "ending_balance"];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object. An array result
/// prints one line per element, prefixed with its loan number when present.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Array(items) => {
            for item in items {
                let answer = key_answer(item);
                match item.get("loan_number").and_then(Value::as_str) {
                    Some(loan) => println!("{}: {}", loan, answer),
                    None => println!("{}", answer),
                }
            }
        }
        other => println!("{}", key_answer(other)),
    }
}

fn key_answer(value: &Value) -> String {
    if let Value::Object(map) = value {
        // Try priority keys first (skip null values)
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_cell(val);
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_cell(val));
        }
    }

    format_cell(value)
}
