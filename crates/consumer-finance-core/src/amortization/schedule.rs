//! Month-by-month amortization schedules.
//!
//! The generator walks the loan one month at a time, decomposing each
//! payment with [`calculate_amortization_payment`] and then applying any
//! extra principal scheduled for that month. The loop is driven by the
//! balance rather than the nominal term, so extra payments shorten the
//! table.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::calculate_amortization_payment;
use super::validate_loan_terms;
use crate::error::FinanceError;
use crate::time_value::{normalize_rate, round_money};
use crate::types::{default_rounding_digits, with_metadata, ComputationOutput, Money, Rate};
use crate::FinanceResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A schedule may run to this multiple of its nominal term before it is
/// declared non-amortizing.
const MAX_TERM_MULTIPLE: u32 = 10;

/// Floor for the iteration bound on very short loans.
const MIN_PERIOD_BOUND: u32 = 1200;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// How the monthly payment evolves over the life of the loan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// The first month's payment is held for the whole loan (mortgage-style).
    #[default]
    Fixed,
    /// The payment is recomputed each month from the remaining balance and term.
    Declining,
}

/// Additional principal paid on top of the scheduled payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraPayment {
    pub amount: Money,
    /// 1-based month index.
    pub month: u32,
    /// Repeat the amount every month through the end of the nominal term.
    #[serde(default)]
    pub fill: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// APR as a fraction (0.06) or a whole percentage (6).
    pub annual_rate: Rate,
    /// Nominal term in months.
    pub months: u32,
    #[serde(default)]
    pub extra_payments: Vec<ExtraPayment>,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default = "default_rounding_digits")]
    pub rounding_digits: u32,
    /// Date the loan is funded; the first payment falls one month later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// A single month in the amortization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub extra_principal: Money,
    pub balance: Money,
    pub total_paid: Money,
    pub total_principal_paid: Money,
    pub total_interest_paid: Money,
}

pub type AmortizationTable = Vec<AmortizationRow>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationScheduleOutput {
    /// Payment due in the first month.
    pub scheduled_payment: Money,
    pub total_months: u32,
    pub total_paid: Money,
    pub total_principal_paid: Money,
    pub total_interest_paid: Money,
    pub total_extra_principal: Money,
    pub rows: AmortizationTable,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the full amortization table for a loan.
///
/// Fails with [`FinanceError::FinancialImpossibility`] if the balance has not
/// reached zero after ten times the nominal term.
pub fn generate_amortization_table(input: &AmortizationInput) -> FinanceResult<AmortizationTable> {
    validate_input(input)?;

    let digits = input.rounding_digits;
    let max_periods = input
        .months
        .saturating_mul(MAX_TERM_MULTIPLE)
        .max(MIN_PERIOD_BOUND);
    let extras = ExtraSchedule::build(&input.extra_payments, input.months, max_periods, digits);

    tracing::debug!(
        principal = %input.principal,
        annual_rate = %input.annual_rate,
        months = input.months,
        mode = ?input.payment_mode,
        extra_payments = input.extra_payments.len(),
        "generating amortization table"
    );

    let mut rows: AmortizationTable = Vec::new();
    let mut balance = round_money(input.principal, digits);
    let mut locked_payment: Option<Money> = None;
    let mut total_paid = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut month: u32 = 0;

    while balance > Decimal::ZERO {
        if month >= max_periods {
            return Err(FinanceError::FinancialImpossibility(format!(
                "Non-amortizing payment: balance of {balance} remains after {month} months"
            )));
        }
        month += 1;

        let remaining = input.months.saturating_sub(month - 1);
        let period = calculate_amortization_payment(
            balance,
            input.annual_rate,
            remaining,
            locked_payment,
            digits,
        );
        if input.payment_mode == PaymentMode::Fixed && locked_payment.is_none() {
            locked_payment = Some(period.payment);
        }

        // Regular payment is already clamped; now clamp the extra on top.
        let mut extra = extras.amount_for(month);
        let mut row_balance = period.balance;
        if extra > Decimal::ZERO {
            let after = round_money(row_balance - extra, digits);
            if after < Decimal::ZERO {
                extra += after;
                row_balance = round_money(Decimal::ZERO, digits);
            } else {
                row_balance = after;
            }
        }

        total_paid += period.payment + extra;
        total_principal += period.principal + extra;
        total_interest += period.interest;

        rows.push(AmortizationRow {
            month,
            payment_date: input
                .start_date
                .and_then(|d| d.checked_add_months(Months::new(month))),
            payment: period.payment,
            principal: period.principal,
            interest: period.interest,
            extra_principal: round_money(extra, digits),
            balance: row_balance,
            total_paid: round_money(total_paid, digits),
            total_principal_paid: round_money(total_principal, digits),
            total_interest_paid: round_money(total_interest, digits),
        });

        balance = row_balance;
    }

    tracing::debug!(rows = rows.len(), "amortization table complete");
    Ok(rows)
}

/// Amortization table plus headline totals in the standard envelope.
pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> FinanceResult<ComputationOutput<AmortizationScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rows = generate_amortization_table(input)?;
    let first = rows.first().ok_or_else(|| {
        FinanceError::ComputationFailure("amortization table is empty".into())
    })?;
    let last = rows.last().ok_or_else(|| {
        FinanceError::ComputationFailure("amortization table is empty".into())
    })?;

    let apr = normalize_rate(input.annual_rate);
    if apr.is_zero() {
        warnings.push(
            "Zero interest rate: the annuity payment is indeterminate, so the loan is repaid in its first month."
                .into(),
        );
    }
    for ep in &input.extra_payments {
        if ep.month > last.month {
            warnings.push(format!(
                "Extra payment of {} in month {} falls after payoff in month {} and was not applied.",
                ep.amount, ep.month, last.month
            ));
        }
    }

    let total_extra = rows
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc + r.extra_principal);

    let output = AmortizationScheduleOutput {
        scheduled_payment: first.payment,
        total_months: last.month,
        total_paid: last.total_paid,
        total_principal_paid: last.total_principal_paid,
        total_interest_paid: last.total_interest_paid,
        total_extra_principal: round_money(total_extra, input.rounding_digits),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "annual_rate": apr.to_string(),
        "nominal_months": input.months,
        "payment_mode": input.payment_mode,
        "rounding_digits": input.rounding_digits,
        "extra_payment_entries": input.extra_payments.len(),
    });

    Ok(with_metadata(
        "Monthly amortization schedule with extra principal payments",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Extra-payment lookup
// ---------------------------------------------------------------------------

/// Extra principal per month, indexed by 1-based month number.
struct ExtraSchedule {
    amounts: Vec<Money>,
}

impl ExtraSchedule {
    /// Entries are applied in ascending month order; a `fill` entry writes
    /// every month through `term`, and later writes win. Entries past `bound`
    /// can never be reached and are dropped.
    fn build(extra_payments: &[ExtraPayment], term: u32, bound: u32, digits: u32) -> Self {
        let mut sorted: Vec<&ExtraPayment> = extra_payments
            .iter()
            .filter(|ep| ep.month <= bound)
            .collect();
        sorted.sort_by_key(|ep| ep.month);

        let term = term.min(bound);
        let last_written = |ep: &ExtraPayment| {
            if ep.fill {
                ep.month.max(term)
            } else {
                ep.month
            }
        };
        let last_month = sorted.iter().map(|ep| last_written(*ep)).max().unwrap_or(0);
        let mut amounts = vec![Decimal::ZERO; last_month as usize + 1];

        for ep in sorted {
            let amount = round_money(ep.amount, digits);
            let first = ep.month as usize;
            let last = last_written(ep) as usize;
            for slot in &mut amounts[first..=last] {
                *slot = amount;
            }
        }

        Self { amounts }
    }

    fn amount_for(&self, month: u32) -> Money {
        self.amounts
            .get(month as usize)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &AmortizationInput) -> FinanceResult<()> {
    validate_loan_terms(
        input.principal,
        input.annual_rate,
        input.months,
        input.rounding_digits,
    )?;
    for (i, ep) in input.extra_payments.iter().enumerate() {
        if ep.amount < Decimal::ZERO {
            return Err(FinanceError::InvalidInput {
                field: format!("extra_payments[{i}].amount"),
                reason: "Extra payment cannot be negative".into(),
            });
        }
        if ep.month == 0 {
            return Err(FinanceError::InvalidInput {
                field: format!("extra_payments[{i}].month"),
                reason: "Months are numbered from 1".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
