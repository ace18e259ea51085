use serde_json::Value;

/// Key answer for a single scenario or a sweep, in priority order.
const RESULT_KEYS: [&str; 3] = ["monthly_payment", "base_case_value", "ending_balance"];

/// Key answer for a comparison, in priority order.
const DIFFERENCE_KEYS: [&str; 3] = ["total_interest_lifetime", "time_shaved", "monthly_payment"];

/// Print just the key answer value from the output.
///
/// Comparisons report the lifetime interest difference; single scenarios
/// report the monthly payment. Falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Object(diffs)) = result_obj.get("differences") {
        if let Some(val) = first_present(diffs, &DIFFERENCE_KEYS) {
            println!("{}", format_minimal(val));
            return;
        }
    }

    match result_obj {
        Value::Object(map) => {
            if let Some(val) = first_present(map, &RESULT_KEYS) {
                println!("{}", format_minimal(val));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        // A bare schedule: report the final balance
        Value::Array(rows) => match rows.last().and_then(|r| r.get("ending_balance")) {
            Some(val) => println!("{}", format_minimal(val)),
            None => println!("{}", format_minimal(result_obj)),
        },
        _ => println!("{}", format_minimal(result_obj)),
    }
}

fn first_present<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
