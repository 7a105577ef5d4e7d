use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_amortization_payment(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::amortization::payment::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::amortization::payment::calculate_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::amortization::schedule::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        consumer_finance_core::amortization::schedule::build_amortization_schedule(&input)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::amortization::schedule::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::amortization::summary::calculate_loan_summary(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_apy(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::interest::compound::ApyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        consumer_finance_core::interest::compound::calculate_apy(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compound_interest(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::interest::compound::CompoundInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::interest::compound::calculate_compound_interest(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn present_value(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::interest::compound::PresentValueInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::interest::compound::calculate_present_value(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simple_interest(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::interest::simple::SimpleInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::interest::simple::calculate_simple_interest(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simple_interest_loan(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::interest::simple::SimpleLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = consumer_finance_core::interest::simple::calculate_simple_interest_loan(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn margin_markup(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::pricing::margin::MarginInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        consumer_finance_core::pricing::margin::calculate_margin(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn target_price(input_json: String) -> NapiResult<String> {
    let input: consumer_finance_core::pricing::margin::PriceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        consumer_finance_core::pricing::margin::calculate_price(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
