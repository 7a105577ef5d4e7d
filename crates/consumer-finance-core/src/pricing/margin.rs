//! Margin and markup ratios between cost and selling price.
//!
//! Margin is profit as a share of price; markup is profit as a share of
//! cost. Ratio inputs follow the same convention as rates: values above 1
//! are whole-number percentages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinanceError;
use crate::time_value::{normalize_rate, round_money};
use crate::types::{default_rounding_digits, with_metadata, ComputationOutput, Money, Rate};
use crate::FinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginInput {
    pub cost: Money,
    pub price: Money,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginOutput {
    pub profit: Money,
    pub margin: Rate,
    pub markup: Rate,
}

/// Ratio the selling price should achieve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTarget {
    Margin(Rate),
    Markup(Rate),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceInput {
    pub cost: Money,
    pub target: PricingTarget,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOutput {
    pub price: Money,
    pub profit: Money,
    pub margin: Rate,
    pub markup: Rate,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// `(price - cost) / price`
pub fn margin(cost: Money, price: Money) -> FinanceResult<Rate> {
    if price.is_zero() {
        return Err(FinanceError::DivisionByZero {
            context: "margin (price is zero)".into(),
        });
    }
    Ok((price - cost) / price)
}

/// `(price - cost) / cost`
pub fn markup(cost: Money, price: Money) -> FinanceResult<Rate> {
    if cost.is_zero() {
        return Err(FinanceError::DivisionByZero {
            context: "markup (cost is zero)".into(),
        });
    }
    Ok((price - cost) / cost)
}

/// Price that yields `margin` on `cost`: `cost / (1 - margin)`.
pub fn price_from_margin(cost: Money, margin: Rate) -> FinanceResult<Money> {
    let margin = normalize_rate(margin);
    if margin >= Decimal::ONE {
        return Err(FinanceError::FinancialImpossibility(
            "A margin of 100% or more cannot be reached at any price".into(),
        ));
    }
    Ok(cost / (Decimal::ONE - margin))
}

/// Price that yields `markup` on `cost`: `cost * (1 + markup)`.
pub fn price_from_markup(cost: Money, markup: Rate) -> Money {
    cost * (Decimal::ONE + normalize_rate(markup))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_margin(input: &MarginInput) -> FinanceResult<ComputationOutput<MarginOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cost(input.cost)?;
    if input.price < input.cost {
        warnings.push("Price is below cost; margin and markup are negative.".into());
    }

    let output = MarginOutput {
        profit: round_money(input.price - input.cost, input.rounding_digits),
        margin: margin(input.cost, input.price)?,
        markup: markup(input.cost, input.price)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({ "rounding_digits": input.rounding_digits });

    Ok(with_metadata(
        "Margin = profit / price; markup = profit / cost",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Selling price needed to hit a margin or markup target.
pub fn calculate_price(input: &PriceInput) -> FinanceResult<ComputationOutput<PriceOutput>> {
    let start = Instant::now();
    validate_cost(input.cost)?;

    let digits = input.rounding_digits;
    let price = match input.target {
        PricingTarget::Margin(m) => price_from_margin(input.cost, m)?,
        PricingTarget::Markup(m) => price_from_markup(input.cost, m),
    };
    let price = round_money(price, digits);

    let output = PriceOutput {
        price,
        profit: round_money(price - input.cost, digits),
        margin: margin(input.cost, price)?,
        markup: markup(input.cost, price)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "target": input.target,
        "rounding_digits": digits,
    });

    Ok(with_metadata(
        "Target price from margin or markup",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_cost(cost: Money) -> FinanceResult<()> {
    if cost <= Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "cost".into(),
            reason: "Cost must be positive".into(),
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
    fn test_margin_and_markup() {
        assert_eq!(margin(dec!(75), dec!(100)).unwrap(), dec!(0.25));
        assert_eq!(markup(dec!(75), dec!(100)).unwrap(), dec!(25) / dec!(75));
    }

    #[test]
    fn test_margin_zero_price() {
        match margin(dec!(10), Decimal::ZERO).unwrap_err() {
            FinanceError::DivisionByZero { .. } => {}
            other => panic!("Expected DivisionByZero, got {other:?}"),
        }
    }

    #[test]
    fn test_price_from_margin_percent_input() {
        assert_eq!(price_from_margin(dec!(75), dec!(25)).unwrap(), dec!(100));
        assert!(price_from_margin(dec!(75), dec!(1)).is_err());
    }

    #[test]
    fn test_price_from_markup() {
        assert_eq!(price_from_markup(dec!(80), dec!(0.5)), dec!(120.0));
    }

    #[test]
    fn test_margin_envelope_below_cost_warns() {
        let out = calculate_margin(&MarginInput {
            cost: dec!(120),
            price: dec!(100),
            rounding_digits: 2,
        })
        .unwrap();
        assert_eq!(out.result.profit, dec!(-20.00));
        assert!(out.result.margin < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_price_envelope_round_trips_margin() {
        let out = calculate_price(&PriceInput {
            cost: dec!(60),
            target: PricingTarget::Margin(dec!(0.4)),
            rounding_digits: 2,
        })
        .unwrap();
        assert_eq!(out.result.price, dec!(100.00));
        assert_eq!(out.result.margin, dec!(0.4));
    }
}
