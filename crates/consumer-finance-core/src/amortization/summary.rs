//! Loan summary: what a set of extra payments saves versus the plain schedule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{generate_amortization_table, AmortizationInput, AmortizationRow};
use crate::error::FinanceError;
use crate::time_value::{normalize_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Totals for the schedule without any extra payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnadjustedTotals {
    pub total_months: u32,
    pub total_interest: Money,
    pub total_amount: Money,
    pub effective_interest_rate: Rate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// First month's payment, before extra payments shrink anything.
    pub monthly_payment: Money,
    pub total_months: u32,
    pub total_interest: Money,
    pub total_amount: Money,
    /// Total interest as a fraction of principal.
    pub effective_interest_rate: Rate,
    pub months_saved: i64,
    pub interest_saved: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub unadjusted: UnadjustedTotals,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare the loan with and without its extra payments.
pub fn calculate_loan_summary(
    input: &AmortizationInput,
) -> FinanceResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let baseline_input = AmortizationInput {
        extra_payments: Vec::new(),
        ..input.clone()
    };
    let baseline = generate_amortization_table(&baseline_input)?;
    let adjusted = generate_amortization_table(input)?;

    let summary = summarize(input.principal, &baseline, &adjusted, input.rounding_digits)?;

    tracing::debug!(
        months = summary.total_months,
        months_saved = summary.months_saved,
        interest_saved = %summary.interest_saved,
        "loan summary computed"
    );

    if summary.months_saved < 0 || summary.interest_saved < Decimal::ZERO {
        warnings.push("Extra payments increased the cost of the loan versus the baseline.".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": normalize_rate(input.annual_rate).to_string(),
        "nominal_months": input.months,
        "payment_mode": input.payment_mode,
        "rounding_digits": input.rounding_digits,
        "extra_payment_entries": input.extra_payments.len(),
    });

    Ok(with_metadata(
        "Baseline vs extra-payment amortization comparison",
        &assumptions,
        warnings,
        elapsed,
        summary,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn summarize(
    principal: Money,
    baseline: &[AmortizationRow],
    adjusted: &[AmortizationRow],
    digits: u32,
) -> FinanceResult<LoanSummary> {
    let (Some(base_last), Some(adj_first), Some(adj_last)) =
        (baseline.last(), adjusted.first(), adjusted.last())
    else {
        return Err(FinanceError::ComputationFailure(
            "amortization table came back empty".into(),
        ));
    };
    if principal.is_zero() {
        return Err(FinanceError::DivisionByZero {
            context: "effective interest rate".into(),
        });
    }

    Ok(LoanSummary {
        monthly_payment: adj_first.payment,
        total_months: adj_last.month,
        total_interest: adj_last.total_interest_paid,
        total_amount: adj_last.total_paid,
        effective_interest_rate: adj_last.total_interest_paid / principal,
        months_saved: i64::from(base_last.month) - i64::from(adj_last.month),
        interest_saved: round_money(
            base_last.total_interest_paid - adj_last.total_interest_paid,
            digits,
        ),
        payoff_date: adj_last.payment_date,
        unadjusted: UnadjustedTotals {
            total_months: base_last.month,
            total_interest: base_last.total_interest_paid,
            total_amount: base_last.total_paid,
            effective_interest_rate: base_last.total_interest_paid / principal,
            payoff_date: base_last.payment_date,
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::{ExtraPayment, PaymentMode};
    use rust_decimal_macros::dec;

    fn mortgage() -> AmortizationInput {
        AmortizationInput {
            principal: dec!(200000),
            annual_rate: dec!(6.5),
            months: 360,
            extra_payments: Vec::new(),
            payment_mode: PaymentMode::Fixed,
            rounding_digits: 2,
            start_date: None,
        }
    }

    #[test]
    fn test_no_extra_payments_saves_nothing() {
        let out = calculate_loan_summary(&mortgage()).unwrap();
        let s = &out.result;
        assert_eq!(s.months_saved, 0);
        assert_eq!(s.interest_saved, dec!(0.00));
        assert_eq!(s.total_interest, s.unadjusted.total_interest);
        assert_eq!(s.total_amount, s.unadjusted.total_amount);
    }

    #[test]
    fn test_monthly_extra_saves_months_and_interest() {
        let mut input = mortgage();
        input.extra_payments = vec![ExtraPayment {
            amount: dec!(250),
            month: 1,
            fill: true,
        }];
        let out = calculate_loan_summary(&input).unwrap();
        let s = &out.result;
        assert!(s.months_saved > 0);
        assert!(s.interest_saved > Decimal::ZERO);
        assert_eq!(
            s.interest_saved,
            s.unadjusted.total_interest - s.total_interest
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_monthly_payment_is_first_row() {
        let mut input = mortgage();
        input.principal = dec!(100000);
        input.annual_rate = dec!(0.06);
        let s = calculate_loan_summary(&input).unwrap().result;
        assert_eq!(s.monthly_payment, dec!(599.55));
    }

    #[test]
    fn test_effective_rate_is_interest_over_principal() {
        let s = calculate_loan_summary(&mortgage()).unwrap().result;
        assert_eq!(s.effective_interest_rate, s.total_interest / dec!(200000));
        assert!(s.effective_interest_rate > Decimal::ONE);
    }

    #[test]
    fn test_empty_table_is_computation_failure() {
        let err = summarize(dec!(1000), &[], &[], 2).unwrap_err();
        match err {
            FinanceError::ComputationFailure(_) => {}
            other => panic!("Expected ComputationFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input_propagates() {
        let mut input = mortgage();
        input.months = 0;
        assert!(calculate_loan_summary(&input).is_err());
    }
}
