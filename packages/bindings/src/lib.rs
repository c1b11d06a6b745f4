use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fincalc_core::{CalculationRequest, ComputationOutput, FinCalcResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the caller's input and rules, run the calculator and return the
/// envelope as a JSON string.
fn run<I, R, T>(
    input_json: &str,
    rules_json: &str,
    calculate: impl FnOnce(&I, &R) -> FinCalcResult<ComputationOutput<T>>,
) -> NapiResult<String>
where
    I: DeserializeOwned,
    R: DeserializeOwned,
    T: Serialize,
{
    let request =
        CalculationRequest::<I, R>::from_json_parts(input_json, rules_json).map_err(to_napi_error)?;
    let output = calculate(&request.input, &request.rules).map_err(to_napi_error)?;
    output.to_json().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Income tax
// ---------------------------------------------------------------------------

#[napi]
pub fn canada_income_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::income_tax::canada::calculate_net_income)
}

#[napi]
pub fn france_income_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::income_tax::france::calculate_net_income)
}

#[napi]
pub fn south_africa_income_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(
        &input_json,
        &rules_json,
        fincalc_core::income_tax::south_africa::calculate_net_income,
    )
}

#[napi]
pub fn uk_income_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::income_tax::uk::calculate_net_income)
}

#[napi]
pub fn australia_income_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::income_tax::australia::calculate_net_income)
}

// ---------------------------------------------------------------------------
// Corporate tax
// ---------------------------------------------------------------------------

#[napi]
pub fn canada_corporate_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::corporate_tax::canada::calculate_corporate_tax)
}

#[napi]
pub fn france_corporate_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::corporate_tax::france::calculate_corporate_tax)
}

#[napi]
pub fn south_africa_corporate_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(
        &input_json,
        &rules_json,
        fincalc_core::corporate_tax::south_africa::calculate_corporate_tax,
    )
}

#[napi]
pub fn uk_corporate_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::corporate_tax::uk::calculate_corporate_tax)
}

#[napi]
pub fn australia_corporate_tax(input_json: String, rules_json: String) -> NapiResult<String> {
    run(
        &input_json,
        &rules_json,
        fincalc_core::corporate_tax::australia::calculate_corporate_tax,
    )
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn canada_mortgage(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::mortgage::canada::calculate_mortgage)
}

#[napi]
pub fn france_mortgage(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::mortgage::france::calculate_mortgage)
}

#[napi]
pub fn south_africa_mortgage(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::mortgage::south_africa::calculate_mortgage)
}

#[napi]
pub fn uk_mortgage(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::mortgage::uk::calculate_mortgage)
}

#[napi]
pub fn australia_mortgage(input_json: String, rules_json: String) -> NapiResult<String> {
    run(&input_json, &rules_json, fincalc_core::mortgage::australia::calculate_mortgage)
}
