//! Single-period payment decomposition.
//!
//! Splits one month's payment on an amortizing loan into interest and
//! principal and reports the balance left afterwards. The schedule generator
//! calls this once per month; it is also exposed directly for quick
//! "what is my payment" questions.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{validate_loan_terms, MONTHS_PER_YEAR};
use crate::error::FinanceError;
use crate::time_value::{normalize_rate, round_money};
use crate::types::{default_rounding_digits, with_metadata, ComputationOutput, Money, Rate};
use crate::FinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// One month's payment split into its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinglePaymentResult {
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance remaining after this payment, never negative.
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Outstanding principal at the start of the period.
    pub principal: Money,
    /// APR as a fraction (0.06) or a whole percentage (6).
    pub annual_rate: Rate,
    /// Months remaining on the loan, including this one.
    pub months: u32,
    /// Use this payment instead of the annuity payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_payment: Option<Money>,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decompose one period's payment.
///
/// Without `fixed_payment` the level annuity payment for `months` remaining
/// periods is used. When the annuity formula is indeterminate (zero months or
/// zero rate) the whole principal plus this period's interest is paid at once. A payment that
/// would overshoot the balance is trimmed so the balance lands on zero.
pub fn calculate_amortization_payment(
    principal: Money,
    annual_rate: Rate,
    months: u32,
    fixed_payment: Option<Money>,
    digits: u32,
) -> SinglePaymentResult {
    let apr = normalize_rate(annual_rate);
    let monthly_rate = apr / MONTHS_PER_YEAR;
    let interest = round_money(principal * monthly_rate, digits);

    let payment = match fixed_payment {
        Some(p) => round_money(p, digits),
        None => match annuity_payment(principal, monthly_rate, months) {
            Some(p) => round_money(p, digits),
            None => {
                tracing::debug!(%principal, %apr, months, "annuity indeterminate, paying off in full");
                round_money(principal + interest, digits)
            }
        },
    };

    let mut payment = payment;
    let mut principal_paid = payment - interest;
    let mut balance = round_money(principal - principal_paid, digits);

    if balance < Decimal::ZERO {
        let overflow = -balance;
        payment -= overflow;
        principal_paid -= overflow;
        balance = round_money(Decimal::ZERO, digits);
    }

    SinglePaymentResult {
        payment,
        interest,
        principal: principal_paid,
        balance,
    }
}

/// Validated single-payment calculation wrapped in the standard envelope.
pub fn calculate_payment(
    input: &PaymentInput,
) -> FinanceResult<ComputationOutput<SinglePaymentResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_terms(
        input.principal,
        input.annual_rate,
        input.months,
        input.rounding_digits,
    )?;
    if let Some(p) = input.fixed_payment {
        if p <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput {
                field: "fixed_payment".into(),
                reason: "Fixed payment must be positive".into(),
            });
        }
    }

    let apr = normalize_rate(input.annual_rate);
    let monthly_rate = apr / MONTHS_PER_YEAR;
    if input.fixed_payment.is_none()
        && annuity_payment(input.principal, monthly_rate, input.months).is_none()
    {
        warnings.push(
            "Annuity payment is indeterminate for these terms; the balance is paid off in one payment."
                .into(),
        );
    }

    let result = calculate_amortization_payment(
        input.principal,
        input.annual_rate,
        input.months,
        input.fixed_payment,
        input.rounding_digits,
    );

    if input.fixed_payment.is_some() && result.principal < Decimal::ZERO {
        warnings.push(format!(
            "Fixed payment {} does not cover interest of {}; the balance grows.",
            result.payment, result.interest
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": apr.to_string(),
        "monthly_rate": monthly_rate.to_string(),
        "rounding_digits": input.rounding_digits,
        "payment_source": if input.fixed_payment.is_some() { "fixed" } else { "annuity" },
    });

    Ok(with_metadata(
        "Level annuity payment with monthly interest accrual",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `P·i·(1+i)^n / ((1+i)^n − 1)`, or `None` when it is indeterminate (zero
/// months or a zero rate). When `(1+i)^n` is too large for a `Decimal` the
/// payment has converged on the interest-only limit `P·i`.
fn annuity_payment(principal: Money, monthly_rate: Rate, months: u32) -> Option<Money> {
    if months == 0 || monthly_rate.is_zero() {
        return None;
    }
    let interest_only = principal.checked_mul(monthly_rate)?;
    let Some(growth) = (Decimal::ONE + monthly_rate).checked_powi(i64::from(months)) else {
        return Some(interest_only);
    };
    match interest_only.checked_mul(growth) {
        Some(numerator) => numerator.checked_div(growth - Decimal::ONE),
        None => interest_only.checked_div(Decimal::ONE - Decimal::ONE / growth),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_mortgage_first_payment() {
        let r = calculate_amortization_payment(dec!(100000), dec!(0.06), 360, None, 2);
        assert_eq!(r.payment, dec!(599.55));
        assert_eq!(r.interest, dec!(500.00));
        assert_eq!(r.principal, dec!(99.55));
        assert_eq!(r.balance, dec!(99900.45));
    }

    #[test]
    fn test_percent_rate_matches_fraction() {
        let a = calculate_amortization_payment(dec!(100000), dec!(6), 360, None, 2);
        let b = calculate_amortization_payment(dec!(100000), dec!(0.06), 360, None, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_components_sum_to_payment() {
        let r = calculate_amortization_payment(dec!(25000), dec!(0.0725), 60, None, 2);
        assert_eq!(r.principal + r.interest, r.payment);
        assert_eq!(r.balance, dec!(25000) - r.principal);
    }

    #[test]
    fn test_fixed_payment_used_directly() {
        let r = calculate_amortization_payment(dec!(10000), dec!(0.12), 24, Some(dec!(500)), 2);
        assert_eq!(r.payment, dec!(500.00));
        assert_eq!(r.interest, dec!(100.00));
        assert_eq!(r.principal, dec!(400.00));
        assert_eq!(r.balance, dec!(9600.00));
    }

    #[test]
    fn test_final_payment_clamped_to_balance() {
        let r = calculate_amortization_payment(dec!(50), dec!(0.12), 3, Some(dec!(100)), 2);
        assert_eq!(r.interest, dec!(0.50));
        assert_eq!(r.payment, dec!(50.50));
        assert_eq!(r.principal, dec!(50.00));
        assert_eq!(r.balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_falls_back_to_payoff() {
        let r = calculate_amortization_payment(dec!(1200), Decimal::ZERO, 12, None, 2);
        assert_eq!(r.payment, dec!(1200.00));
        assert_eq!(r.interest, dec!(0.00));
        assert_eq!(r.balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_months_falls_back_to_payoff() {
        let r = calculate_amortization_payment(dec!(1000), dec!(0.12), 0, None, 2);
        assert_eq!(r.payment, dec!(1010.00));
        assert_eq!(r.principal, dec!(1000.00));
        assert_eq!(r.balance, Decimal::ZERO);
    }

    #[test]
    fn test_very_long_term_converges_on_interest_only() {
        // (1.005)^14000 does not fit in a Decimal.
        let r = calculate_amortization_payment(dec!(1000), dec!(0.06), 14000, None, 2);
        assert_eq!(r.payment, dec!(5.00));
        assert_eq!(r.interest, dec!(5.00));
        assert_eq!(r.principal, dec!(0.00));
        assert_eq!(r.balance, dec!(1000.00));
    }

    #[test]
    fn test_high_rate_long_term_is_not_paid_off() {
        let r = calculate_amortization_payment(dec!(1000), dec!(1.0), 1000, None, 2);
        assert_eq!(r.interest, dec!(83.33));
        assert_eq!(r.payment, dec!(83.33));
        assert_eq!(r.balance, dec!(1000.00));
    }

    #[test]
    fn test_single_month_loan() {
        let r = calculate_amortization_payment(dec!(100), dec!(0.12), 1, None, 2);
        assert_eq!(r.payment, dec!(101.00));
        assert_eq!(r.balance, Decimal::ZERO);
    }

    #[test]
    fn test_rounding_digits_respected() {
        let r = calculate_amortization_payment(dec!(100000), dec!(0.06), 360, None, 4);
        assert_eq!(r.payment.scale(), 4);
        assert!((r.payment - dec!(599.5505)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_envelope_rejects_zero_principal() {
        let input = PaymentInput {
            principal: Decimal::ZERO,
            annual_rate: dec!(0.05),
            months: 12,
            fixed_payment: None,
            rounding_digits: 2,
        };
        match calculate_payment(&input).unwrap_err() {
            FinanceError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_warns_on_negative_amortization() {
        let input = PaymentInput {
            principal: dec!(10000),
            annual_rate: dec!(0.12),
            months: 12,
            fixed_payment: Some(dec!(50)),
            rounding_digits: 2,
        };
        let out = calculate_payment(&input).unwrap();
        assert_eq!(out.result.balance, dec!(10050.00));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
