pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Money fields rendered as currency in human-readable output.
pub(crate) const MONEY_FIELDS: [&str; 10] = [
    "payment_amount",
    "monthly_payment",
    "total_mortgage",
    "total_interest_term",
    "total_interest_lifetime",
    "balance_at_end_of_term",
    "principal_paid",
    "interest_paid",
    "extra_payments",
    "ending_balance",
];

/// Fields holding fractional years.
pub(crate) const YEAR_FIELDS: [&str; 2] = ["effective_amortization", "time_shaved"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Row-shaped data nested in a result (a schedule or sweep points), if any.
pub(crate) fn nested_rows(result: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    result.iter().find_map(|(key, val)| match val {
        Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
            Some((key.as_str(), rows.as_slice()))
        }
        _ => None,
    })
}
