use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_compare_core::comparison::differences::{self, ComparisonInput};
use mortgage_compare_core::comparison::form::{self, ScenarioForm};
use mortgage_compare_core::mortgage::amortization;
use mortgage_compare_core::mortgage::scenario::Scenario;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct RecomputeInput {
    form_a: ScenarioForm,
    form_b: ScenarioForm,
}

#[napi]
pub fn calculate_mortgage(input_json: String) -> NapiResult<String> {
    let scenario: Scenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_mortgage(&scenario).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = differences::compare_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Returns `"null"` while either form is incomplete.
#[napi]
pub fn recompute(input_json: String) -> NapiResult<String> {
    let input: RecomputeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = form::recompute(&input.form_a, &input.form_b).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn format_currency(amount: String) -> NapiResult<String> {
    let value: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(mortgage_compare_core::format::format_currency(value))
}
