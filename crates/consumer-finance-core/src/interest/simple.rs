use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinanceError;
use crate::time_value::{normalize_rate, round_money};
use crate::types::{
    default_rounding_digits, with_metadata, ComputationOutput, Money, Rate, Years,
    MAX_ROUNDING_DIGITS,
};
use crate::FinanceResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleInterestInput {
    pub principal: Money,
    pub annual_rate: Rate,
    pub years: Years,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleInterestOutput {
    pub interest: Money,
    pub total_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleLoanInput {
    pub principal: Money,
    pub annual_rate: Rate,
    /// Term in months; anything below 1 is treated as a single month.
    pub months: i64,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

/// Add-on interest loan: interest is charged on the original principal for
/// the whole term and the total is split into equal installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleLoanOutput {
    pub months: u32,
    pub total_interest: Money,
    pub total_amount: Money,
    pub payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// `P * r * t`, rounded.
pub fn simple_interest(principal: Money, annual_rate: Rate, years: Years, digits: u32) -> Money {
    round_money(principal * normalize_rate(annual_rate) * years, digits)
}

/// Add-on simple-interest loan. Terms of zero or fewer months become one month.
pub fn simple_interest_loan(
    principal: Money,
    annual_rate: Rate,
    months: i64,
    digits: u32,
) -> SimpleLoanOutput {
    let months = u32::try_from(months.max(1)).unwrap_or(u32::MAX);
    let term = Decimal::from(months);

    let total_interest = round_money(
        principal * normalize_rate(annual_rate) * term / MONTHS_PER_YEAR,
        digits,
    );
    let total_amount = round_money(principal + total_interest, digits);

    SimpleLoanOutput {
        months,
        total_interest,
        total_amount,
        payment: round_money(total_amount / term, digits),
    }
}

pub fn calculate_simple_interest(
    input: &SimpleInterestInput,
) -> FinanceResult<ComputationOutput<SimpleInterestOutput>> {
    let start = Instant::now();
    validate_common(input.annual_rate, input.rounding_digits)?;
    if input.years < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "years".into(),
            reason: "Years cannot be negative".into(),
        });
    }

    let digits = input.rounding_digits;
    let interest = simple_interest(input.principal, input.annual_rate, input.years, digits);
    let output = SimpleInterestOutput {
        interest,
        total_amount: round_money(input.principal + interest, digits),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": normalize_rate(input.annual_rate).to_string(),
        "rounding_digits": digits,
    });

    Ok(with_metadata(
        "Simple interest: P * r * t",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

pub fn calculate_simple_interest_loan(
    input: &SimpleLoanInput,
) -> FinanceResult<ComputationOutput<SimpleLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_common(input.annual_rate, input.rounding_digits)?;

    if input.months < 1 {
        warnings.push(format!(
            "Term of {} months treated as a single month.",
            input.months
        ));
    }

    let output = simple_interest_loan(
        input.principal,
        input.annual_rate,
        input.months,
        input.rounding_digits,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": normalize_rate(input.annual_rate).to_string(),
        "months": output.months,
        "rounding_digits": input.rounding_digits,
    });

    Ok(with_metadata(
        "Add-on simple interest loan with level installments",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_common(rate: Rate, digits: u32) -> FinanceResult<()> {
    if rate < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if digits > MAX_ROUNDING_DIGITS {
        return Err(FinanceError::InvalidInput {
            field: "rounding_digits".into(),
            reason: format!("Rounding digits cannot exceed {MAX_ROUNDING_DIGITS}"),
        });
    }
    Ok(())
}
