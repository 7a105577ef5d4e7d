use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::FinanceError;
use crate::types::{CompoundingPeriod, Money, Rate, Years, MAX_ROUNDING_DIGITS};
use crate::FinanceResult;

/// Round a monetary value half-away-from-zero and pin its scale to `digits`,
/// so `500` comes back as `500.00` at two digits.
pub fn round_money(value: Decimal, digits: u32) -> Money {
    let digits = digits.min(MAX_ROUNDING_DIGITS);
    let mut rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);
    rounded
}

/// Rates above 1 are whole-number percentages (`5` means 5%). Exactly `1` is
/// a 100% fractional rate.
pub fn normalize_rate(rate: Rate) -> Rate {
    if rate > Decimal::ONE {
        rate / dec!(100)
    } else {
        rate
    }
}

/// `base^exponent`, using exact repeated multiplication for whole exponents.
/// Returns `None` when the result does not fit in a `Decimal`.
pub(crate) fn checked_growth(base: Decimal, exponent: Decimal) -> Option<Decimal> {
    if exponent.fract().is_zero() {
        base.checked_powi(exponent.to_i64()?)
    } else {
        base.checked_powd(exponent)
    }
}

/// Effective annual yield of a nominal APR: `(1 + apr/n)^n - 1`.
pub fn annual_percentage_yield(apr: Rate, period: CompoundingPeriod) -> FinanceResult<Rate> {
    let apr = normalize_rate(apr);
    let n = period.periods_per_year();
    let factor = checked_growth(Decimal::ONE + apr / n, n).ok_or_else(|| {
        FinanceError::FinancialImpossibility(format!(
            "APY growth factor overflowed for rate {apr} compounded {period}"
        ))
    })?;
    Ok(factor - Decimal::ONE)
}

/// Future value of a lump sum under periodic compounding:
/// `P * (1 + apr/n)^(n * years)`, rounded to `digits`.
pub fn compound_future_value(
    principal: Money,
    apr: Rate,
    years: Years,
    period: CompoundingPeriod,
    digits: u32,
) -> FinanceResult<Money> {
    let apr = normalize_rate(apr);
    let n = period.periods_per_year();
    let factor = checked_growth(Decimal::ONE + apr / n, n * years).ok_or_else(|| {
        FinanceError::FinancialImpossibility(format!(
            "Compound growth factor overflowed over {years} years"
        ))
    })?;
    Ok(round_money(principal * factor, digits))
}

/// Discount a future amount back `years` annual periods: `FV / (1 + rate)^years`.
pub fn present_value(future_value: Money, rate: Rate, years: Years, digits: u32) -> FinanceResult<Money> {
    let rate = normalize_rate(rate);
    if rate <= dec!(-1) {
        return Err(FinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let factor = checked_growth(Decimal::ONE + rate, years).ok_or_else(|| {
        FinanceError::FinancialImpossibility(format!("Discount factor overflowed over {years} years"))
    })?;
    if factor.is_zero() {
        return Err(FinanceError::DivisionByZero {
            context: "present value discount factor".into(),
        });
    }

    Ok(round_money(future_value / factor, digits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345), 2), dec!(-2.35));
        assert_eq!(round_money(dec!(2.344), 2), dec!(2.34));
    }

    #[test]
    fn test_round_money_pins_scale() {
        let r = round_money(dec!(500), 2);
        assert_eq!(r.scale(), 2);
        assert_eq!(r.to_string(), "500.00");
        assert_eq!(round_money(dec!(1.23456), 4).to_string(), "1.2346");
    }

    #[test]
    fn test_normalize_rate_boundary() {
        assert_eq!(normalize_rate(dec!(5)), dec!(0.05));
        assert_eq!(normalize_rate(dec!(0.05)), dec!(0.05));
        // Exactly 1 stays a 100% fraction, not 1%.
        assert_eq!(normalize_rate(dec!(1.0)), dec!(1.0));
        assert_eq!(normalize_rate(dec!(1.5)), dec!(0.015));
    }

    #[test]
    fn test_apy_monthly() {
        let apy = annual_percentage_yield(dec!(0.05), CompoundingPeriod::Monthly).unwrap();
        // (1 + 0.05/12)^12 - 1 ≈ 0.0511619
        assert!((apy - dec!(0.05116)).abs() < dec!(0.00001), "got {apy}");
    }

    #[test]
    fn test_apy_percent_input_matches_fraction() {
        let a = annual_percentage_yield(dec!(5), CompoundingPeriod::Quarterly).unwrap();
        let b = annual_percentage_yield(dec!(0.05), CompoundingPeriod::Quarterly).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_apy_annual_equals_apr() {
        let apy = annual_percentage_yield(dec!(0.07), CompoundingPeriod::Annually).unwrap();
        assert_eq!(apy, dec!(0.07));
    }

    #[test]
    fn test_apy_biannual_below_apr() {
        let apy = annual_percentage_yield(dec!(0.10), CompoundingPeriod::Biannually).unwrap();
        // (1 + 0.2)^0.5 - 1 ≈ 0.0954
        assert!(apy < dec!(0.10));
        assert!((apy - dec!(0.0954)).abs() < dec!(0.001), "got {apy}");
    }

    #[test]
    fn test_compound_future_value_annual() {
        let fv = compound_future_value(dec!(1000), dec!(0.10), dec!(2), CompoundingPeriod::Annually, 2)
            .unwrap();
        assert_eq!(fv, dec!(1210.00));
    }

    #[test]
    fn test_present_value_basic() {
        let pv = present_value(dec!(1210), dec!(10), dec!(2), 2).unwrap();
        assert_eq!(pv, dec!(1000.00));
    }

    #[test]
    fn test_present_value_rejects_total_loss_rate() {
        assert!(present_value(dec!(100), dec!(-1), dec!(1), 2).is_err());
    }
}
