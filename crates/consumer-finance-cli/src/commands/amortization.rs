use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use consumer_finance_core::amortization::payment::{self, PaymentInput};
use consumer_finance_core::amortization::schedule::{
    self, AmortizationInput, ExtraPayment, PaymentMode,
};
use consumer_finance_core::amortization::summary;
use consumer_finance_core::DEFAULT_ROUNDING_DIGITS;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Hold the first month's payment for the whole loan
    Fixed,
    /// Recompute the payment every month from the remaining balance
    Declining,
}

impl From<ModeArg> for PaymentMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Fixed => PaymentMode::Fixed,
            ModeArg::Declining => PaymentMode::Declining,
        }
    }
}

/// Arguments for a single payment breakdown
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a fraction (0.06) or percentage (6)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Remaining months
    #[arg(long)]
    pub months: Option<u32>,

    /// Pay this amount instead of the annuity payment
    #[arg(long)]
    pub fixed_payment: Option<Decimal>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

/// Arguments shared by the schedule and loan summary commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a fraction (0.06) or percentage (6)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Payment mode
    #[arg(long, value_enum, default_value = "fixed")]
    pub mode: ModeArg,

    /// Extra principal as AMOUNT@MONTH, with a trailing '+' to repeat it
    /// every month to the end of the term (e.g. "100@6+"). Repeatable.
    #[arg(long = "extra", value_parser = parse_extra_payment)]
    pub extra: Vec<ExtraPayment>,

    /// Funding date (YYYY-MM-DD); payments fall monthly after it
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            months: args.months.ok_or("--months is required (or provide --input)")?,
            fixed_payment: args.fixed_payment,
            rounding_digits: args.digits,
        }
    };

    let result = payment::calculate_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args)?;
    let result = schedule::build_amortization_schedule(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_loan_summary(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args)?;
    let result = summary::calculate_loan_summary(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

fn resolve_loan_input(args: LoanArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Ok(AmortizationInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        months: args.months.ok_or("--months is required (or provide --input)")?,
        extra_payments: args.extra,
        payment_mode: args.mode.into(),
        rounding_digits: args.digits,
        start_date: args.start_date,
    })
}

/// Parse `AMOUNT@MONTH` or `AMOUNT@MONTH+`.
fn parse_extra_payment(s: &str) -> Result<ExtraPayment, String> {
    let (body, fill) = match s.trim().strip_suffix('+') {
        Some(body) => (body, true),
        None => (s.trim(), false),
    };
    let (amount, month) = body
        .split_once('@')
        .ok_or_else(|| format!("expected AMOUNT@MONTH, got '{s}'"))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid extra amount '{amount}': {e}"))?;
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|e| format!("invalid extra month '{month}': {e}"))?;
    Ok(ExtraPayment { amount, month, fill })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_one_off_extra() {
        let ep = parse_extra_payment("250.50@12").unwrap();
        assert_eq!(ep.amount, dec!(250.50));
        assert_eq!(ep.month, 12);
        assert!(!ep.fill);
    }

    #[test]
    fn test_parse_fill_extra() {
        let ep = parse_extra_payment("100@6+").unwrap();
        assert_eq!(ep.month, 6);
        assert!(ep.fill);
    }

    #[test]
    fn test_parse_rejects_missing_month() {
        assert!(parse_extra_payment("100").is_err());
        assert!(parse_extra_payment("abc@3").is_err());
    }
}
