pub mod csv_out;
pub mod export;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted keys (`first.payment_date`) so each
/// array element renders as a single row.
pub(crate) fn flatten_object(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, out),
            other => out.push((name, other.clone())),
        }
    }
}

/// Render an array of objects as a header row plus string cells. Headers are
/// the union of every element's flattened keys in first-seen order. Returns
/// `None` when the elements are not objects.
pub(crate) fn tabulate(arr: &[Value]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    if !arr.iter().all(Value::is_object) {
        return None;
    }

    let flat_rows: Vec<Vec<(String, Value)>> = arr
        .iter()
        .filter_map(Value::as_object)
        .map(flatten_object)
        .collect();

    let mut headers: Vec<String> = Vec::new();
    for row in &flat_rows {
        for (key, _) in row {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows: Vec<Vec<String>> = flat_rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| {
                    row.iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| format_cell(v))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    Some((headers, rows))
}

/// Plain-text cell: strings unquoted, null as empty.
pub(crate) fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_cell).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Split an envelope `result` object into scalar fields and row arrays.
pub(crate) fn split_result(map: &Map<String, Value>) -> (Vec<(&str, &Value)>, Vec<(&str, &[Value])>) {
    let mut scalars = Vec::new();
    let mut arrays = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                arrays.push((key.as_str(), items.as_slice()))
            }
            other => scalars.push((key.as_str(), other)),
        }
    }
    (scalars, arrays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_rows() {
        let value = json!({
            "loan_number": "A",
            "first": { "period": 1, "interest": "10.00" },
            "last": null
        });
        let flat = flatten_object(value.as_object().unwrap());
        let keys: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["loan_number", "first.period", "first.interest", "last"]);
    }

    #[test]
    fn test_tabulate_unions_headers() {
        let value = json!([
            { "loan_number": "A", "first": null, "total": "0.00" },
            { "loan_number": "B", "first": { "period": 1 }, "total": "5.00" }
        ]);
        let (headers, rows) = tabulate(value.as_array().unwrap()).unwrap();
        assert_eq!(headers, vec!["loan_number", "first", "total", "first.period"]);
        assert_eq!(rows[0], vec!["A", "", "0.00", ""]);
        assert_eq!(rows[1], vec!["B", "", "5.00", "1"]);
    }

    #[test]
    fn test_tabulate_rejects_scalars() {
        assert!(tabulate(&[json!(1), json!(2)]).is_none());
    }

    #[test]
    fn test_split_result_separates_row_arrays() {
        let value = json!({
            "loan_count": 1,
            "rows": [{ "period": 0 }],
            "tags": ["x"]
        });
        let (scalars, arrays) = split_result(value.as_object().unwrap());
        assert_eq!(scalars.len(), 2);
        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays[0].0, "rows");
    }
}
