use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use consumer_finance_core::interest::compound::{
    self, ApyInput, CompoundInterestInput, PresentValueInput,
};
use consumer_finance_core::interest::simple::{self, SimpleInterestInput, SimpleLoanInput};
use consumer_finance_core::{CompoundingPeriod, DEFAULT_ROUNDING_DIGITS};

use crate::input;

/// Arguments for APR to APY conversion
#[derive(Args)]
pub struct ApyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Nominal APR as a fraction (0.05) or percentage (5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Compounding period (daily, weekly, biweekly, semimonthly, monthly,
    /// bimonthly, quarterly, semiannually, annually, biannually)
    #[arg(long, default_value = "monthly")]
    pub period: CompoundingPeriod,
}

/// Arguments for compound interest growth
#[derive(Args)]
pub struct CompoundArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Starting balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a fraction or percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years of growth
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Compounding period
    #[arg(long, default_value = "monthly")]
    pub period: CompoundingPeriod,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

/// Arguments for present value discounting
#[derive(Args)]
pub struct PresentValueArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount received in the future
    #[arg(long)]
    pub future_value: Option<Decimal>,

    /// Annual discount rate as a fraction or percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years until the amount is received
    #[arg(long)]
    pub years: Option<Decimal>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

/// Arguments for simple interest
#[derive(Args)]
pub struct SimpleInterestArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate as a fraction or percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub years: Option<Decimal>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

/// Arguments for an add-on simple interest loan
#[derive(Args)]
pub struct SimpleLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate as a fraction or percentage
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months (values below 1 are treated as 1)
    #[arg(long, allow_hyphen_values = true)]
    pub months: Option<i64>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

pub fn run_apy(args: ApyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let apy_input: ApyInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ApyInput {
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            period: args.period,
        }
    };
    let result = compound::calculate_apy(&apy_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ci_input: CompoundInterestInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CompoundInterestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            period: args.period,
            rounding_digits: args.digits,
        }
    };
    let result = compound::calculate_compound_interest(&ci_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_present_value(args: PresentValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pv_input: PresentValueInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PresentValueInput {
            future_value: args
                .future_value
                .ok_or("--future-value is required (or provide --input)")?,
            discount_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            rounding_digits: args.digits,
        }
    };
    let result = compound::calculate_present_value(&pv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simple_interest(args: SimpleInterestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let si_input: SimpleInterestInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SimpleInterestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            rounding_digits: args.digits,
        }
    };
    let result = simple::calculate_simple_interest(&si_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_simple_loan(args: SimpleLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: SimpleLoanInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SimpleLoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            months: args.months.ok_or("--months is required (or provide --input)")?,
            rounding_digits: args.digits,
        }
    };
    let result = simple::calculate_simple_interest_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct ApyCli {
        #[command(flatten)]
        args: ApyArgs,
    }

    #[derive(Parser)]
    struct SimpleLoanCli {
        #[command(flatten)]
        args: SimpleLoanArgs,
    }

    #[test]
    fn test_apy_period_defaults_to_monthly() {
        let cli = ApyCli::try_parse_from(["cfc", "--rate", "5"]).unwrap();
        assert_eq!(cli.args.rate, Some(dec!(5)));
        assert_eq!(cli.args.period, CompoundingPeriod::Monthly);
    }

    #[test]
    fn test_apy_period_parsed_case_insensitively() {
        let cli = ApyCli::try_parse_from(["cfc", "--rate", "5", "--period", "Quarterly"]).unwrap();
        assert_eq!(cli.args.period, CompoundingPeriod::Quarterly);
        assert!(ApyCli::try_parse_from(["cfc", "--period", "fortnightly"]).is_err());
    }

    #[test]
    fn test_simple_loan_accepts_negative_months() {
        let cli = SimpleLoanCli::try_parse_from([
            "cfc", "--principal", "1000", "--rate", "12", "--months", "-3",
        ])
        .unwrap();
        assert_eq!(cli.args.months, Some(-3));
        assert_eq!(cli.args.digits, DEFAULT_ROUNDING_DIGITS);
    }
}
