//! Loan amortization: single-period payment decomposition, month-by-month
//! schedules with extra principal payments, and the baseline-vs-adjusted
//! loan summary built on top of them.

pub mod payment;
pub mod schedule;
pub mod summary;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FinanceError;
use crate::types::{Money, Rate, MAX_ROUNDING_DIGITS};
use crate::FinanceResult;

pub(crate) const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest accepted loan term: one hundred years.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Checks shared by every amortization entry point.
pub(crate) fn validate_loan_terms(
    principal: Money,
    annual_rate: Rate,
    months: u32,
    rounding_digits: u32,
) -> FinanceResult<()> {
    if principal <= Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(FinanceError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    if months == 0 {
        return Err(FinanceError::InvalidInput {
            field: "months".into(),
            reason: "Loan term must be at least one month".into(),
        });
    }
    if months > MAX_TERM_MONTHS {
        return Err(FinanceError::InvalidInput {
            field: "months".into(),
            reason: format!("Loan term cannot exceed {MAX_TERM_MONTHS} months"),
        });
    }
    if rounding_digits > MAX_ROUNDING_DIGITS {
        return Err(FinanceError::InvalidInput {
            field: "rounding_digits".into(),
            reason: format!("Rounding digits cannot exceed {MAX_ROUNDING_DIGITS}"),
        });
    }
    Ok(())
}
