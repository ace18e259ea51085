use rust_decimal::Decimal;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use mortgage_compare_core::comparison::differences::{Advantage, Comparison};
use mortgage_compare_core::format::{format_currency, format_years};

use super::{nested_rows, MONEY_FIELDS, YEAR_FIELDS};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
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

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Ok(comparison) = serde_json::from_value::<Comparison>(result.clone()) {
        print_comparison(&comparison);
    } else if let Value::Object(res_map) = result {
        let rows = nested_rows(res_map);
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if rows.is_some_and(|(name, _)| name == key.as_str()) {
                continue;
            }
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        println!("{}", Table::from(builder));

        if let Some((name, rows)) = rows {
            println!("\n{}:", name);
            print_array_table(rows);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

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

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_comparison(c: &Comparison) {
    let (a, b, d) = (&c.scenario_a, &c.scenario_b, &c.differences);

    let mut builder = Builder::default();
    builder.push_record(["", "Scenario A", "Scenario B", "Difference (B − A)", "Better"]);

    let money_rows: [(&str, Decimal, Decimal, Decimal); 4] = [
        ("Monthly payment", a.monthly_payment, b.monthly_payment, d.monthly_payment),
        (
            "Interest over term",
            a.total_interest_term,
            b.total_interest_term,
            d.total_interest_term,
        ),
        (
            "Lifetime interest",
            a.total_interest_lifetime,
            b.total_interest_lifetime,
            d.total_interest_lifetime,
        ),
        (
            "Balance at end of term",
            a.balance_at_end_of_term,
            b.balance_at_end_of_term,
            d.balance_at_end_of_term,
        ),
    ];
    for (label, va, vb, delta) in money_rows {
        builder.push_record([
            label.to_string(),
            format_currency(va),
            format_currency(vb),
            format_currency(delta),
            Advantage::from_cost_delta(delta).label().to_string(),
        ]);
    }

    builder.push_record([
        "Payoff time".to_string(),
        format_years(a.effective_amortization),
        format_years(b.effective_amortization),
        format!("{} sooner", format_years(d.time_shaved)),
        d.payoff_advantage().label().to_string(),
    ]);

    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_field(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Render money as currency and year fractions as years; everything else verbatim.
fn format_field(key: &str, value: &Value) -> String {
    let parsed = match value {
        Value::String(s) => s.parse::<Decimal>().ok(),
        _ => None,
    };
    match parsed {
        Some(d) if MONEY_FIELDS.contains(&key) => format_currency(d),
        Some(d) if YEAR_FIELDS.contains(&key) => format_years(d),
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
