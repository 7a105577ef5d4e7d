use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinanceError;
use crate::time_value::{
    annual_percentage_yield, compound_future_value, normalize_rate, present_value, round_money,
};
use crate::types::{
    default_rounding_digits, with_metadata, CompoundingPeriod, ComputationOutput, Money, Rate,
    Years, MAX_ROUNDING_DIGITS,
};
use crate::FinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: Money,
    /// APR as a fraction (0.05) or a whole percentage (5).
    pub annual_rate: Rate,
    pub years: Years,
    #[serde(default)]
    pub period: CompoundingPeriod,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub future_value: Money,
    pub interest_earned: Money,
    /// Effective annual yield implied by the compounding period.
    pub apy: Rate,
    pub periods_per_year: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyInput {
    pub annual_rate: Rate,
    #[serde(default)]
    pub period: CompoundingPeriod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApyOutput {
    pub apy: Rate,
    pub nominal_rate: Rate,
    pub periods_per_year: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueInput {
    pub future_value: Money,
    /// Annual discount rate as a fraction or a whole percentage.
    pub discount_rate: Rate,
    pub years: Years,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentValueOutput {
    pub present_value: Money,
    /// Future value minus present value.
    pub discount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Grow a lump sum under periodic compounding.
pub fn calculate_compound_interest(
    input: &CompoundInterestInput,
) -> FinanceResult<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();
    validate_rate_and_years(input.annual_rate, input.years, input.rounding_digits)?;

    let digits = input.rounding_digits;
    let future_value =
        compound_future_value(input.principal, input.annual_rate, input.years, input.period, digits)?;
    let apy = annual_percentage_yield(input.annual_rate, input.period)?;

    let output = CompoundInterestOutput {
        future_value,
        interest_earned: round_money(future_value - input.principal, digits),
        apy,
        periods_per_year: input.period.periods_per_year(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": normalize_rate(input.annual_rate).to_string(),
        "period": input.period,
        "rounding_digits": digits,
    });

    Ok(with_metadata(
        "Compound interest: P(1 + r/n)^(n*t)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Convert a nominal APR to its effective annual yield.
pub fn calculate_apy(input: &ApyInput) -> FinanceResult<ComputationOutput<ApyOutput>> {
    let start = Instant::now();
    validate_rate_and_years(input.annual_rate, Decimal::ZERO, 0)?;

    let nominal = normalize_rate(input.annual_rate);
    let output = ApyOutput {
        apy: annual_percentage_yield(input.annual_rate, input.period)?,
        nominal_rate: nominal,
        periods_per_year: input.period.periods_per_year(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({ "period": input.period });

    Ok(with_metadata(
        "APY = (1 + APR/n)^n - 1",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Discount a future amount at an annual rate.
pub fn calculate_present_value(
    input: &PresentValueInput,
) -> FinanceResult<ComputationOutput<PresentValueOutput>> {
    let start = Instant::now();
    if input.rounding_digits > MAX_ROUNDING_DIGITS {
        return Err(FinanceError::InvalidInput {
            field: "rounding_digits".into(),
            reason: format!("Rounding digits cannot exceed {MAX_ROUNDING_DIGITS}"),
        });
    }

    let digits = input.rounding_digits;
    let pv = present_value(input.future_value, input.discount_rate, input.years, digits)?;
    let output = PresentValueOutput {
        present_value: pv,
        discount: round_money(input.future_value - pv, digits),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "discount_rate": normalize_rate(input.discount_rate).to_string(),
        "compounding": "annual",
    });

    Ok(with_metadata(
        "Present value: FV / (1 + r)^t",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_rate_and_years(rate: Rate, years: Years, digits: u32) -> FinanceResult<()> {
    if rate < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if years < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "years".into(),
            reason: "Years cannot be negative".into(),
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_monthly_ten_years() {
        let input = CompoundInterestInput {
            principal: dec!(10000),
            annual_rate: dec!(5),
            years: dec!(10),
            period: CompoundingPeriod::Monthly,
            rounding_digits: 2,
        };
        let out = calculate_compound_interest(&input).unwrap();
        // 10000 * (1 + 0.05/12)^120 ≈ 16470.09
        assert!((out.result.future_value - dec!(16470.09)).abs() <= dec!(0.01));
        assert_eq!(
            out.result.interest_earned,
            out.result.future_value - dec!(10000)
        );
        assert_eq!(out.result.periods_per_year, dec!(12));
    }

    #[test]
    fn test_compound_zero_years_returns_principal() {
        let input = CompoundInterestInput {
            principal: dec!(2500),
            annual_rate: dec!(0.04),
            years: Decimal::ZERO,
            period: CompoundingPeriod::Daily,
            rounding_digits: 2,
        };
        let out = calculate_compound_interest(&input).unwrap();
        assert_eq!(out.result.future_value, dec!(2500.00));
        assert_eq!(out.result.interest_earned, dec!(0.00));
    }

    #[test]
    fn test_apy_envelope() {
        let out = calculate_apy(&ApyInput {
            annual_rate: dec!(0.05),
            period: CompoundingPeriod::Monthly,
        })
        .unwrap();
        assert!((out.result.apy - dec!(0.05116)).abs() < dec!(0.00001));
        assert!(out.result.apy > out.result.nominal_rate);
    }

    #[test]
    fn test_apy_negative_rate_rejected() {
        let err = calculate_apy(&ApyInput {
            annual_rate: dec!(-0.01),
            period: CompoundingPeriod::Monthly,
        })
        .unwrap_err();
        match err {
            FinanceError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_present_value_envelope() {
        let out = calculate_present_value(&PresentValueInput {
            future_value: dec!(1000),
            discount_rate: dec!(0.05),
            years: dec!(3),
            rounding_digits: 2,
        })
        .unwrap();
        // 1000 / 1.157625 ≈ 863.84
        assert_eq!(out.result.present_value, dec!(863.84));
        assert_eq!(out.result.discount, dec!(136.16));
    }
}
