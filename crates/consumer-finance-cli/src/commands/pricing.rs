use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use consumer_finance_core::pricing::margin::{self, MarginInput, PriceInput, PricingTarget};
use consumer_finance_core::DEFAULT_ROUNDING_DIGITS;

use crate::input;

/// Arguments for margin / markup from cost and price
#[derive(Args)]
pub struct MarginArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub cost: Option<Decimal>,

    #[arg(long)]
    pub price: Option<Decimal>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

/// Arguments for pricing to a margin or markup target
#[derive(Args)]
pub struct PriceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Target margin as a fraction or percentage
    #[arg(long, conflicts_with = "markup")]
    pub margin: Option<Decimal>,

    /// Target markup as a fraction or percentage
    #[arg(long)]
    pub markup: Option<Decimal>,

    /// Decimal digits for monetary output
    #[arg(long, default_value_t = DEFAULT_ROUNDING_DIGITS)]
    pub digits: u32,
}

pub fn run_margin(args: MarginArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let margin_input: MarginInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MarginInput {
            cost: args.cost.ok_or("--cost is required (or provide --input)")?,
            price: args.price.ok_or("--price is required (or provide --input)")?,
            rounding_digits: args.digits,
        }
    };
    let result = margin::calculate_margin(&margin_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let price_input: PriceInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PriceInput {
            cost: args.cost.ok_or("--cost is required (or provide --input)")?,
            target: pricing_target(args.margin, args.markup)?,
            rounding_digits: args.digits,
        }
    };
    let result = margin::calculate_price(&price_input)?;
    Ok(serde_json::to_value(result)?)
}

fn pricing_target(
    margin: Option<Decimal>,
    markup: Option<Decimal>,
) -> Result<PricingTarget, Box<dyn std::error::Error>> {
    match (margin, markup) {
        (Some(m), None) => Ok(PricingTarget::Margin(m)),
        (None, Some(m)) => Ok(PricingTarget::Markup(m)),
        _ => Err("exactly one of --margin or --markup is required".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct PriceCli {
        #[command(flatten)]
        args: PriceArgs,
    }

    #[test]
    fn test_pricing_target_from_flags() {
        match pricing_target(Some(dec!(25)), None).unwrap() {
            PricingTarget::Margin(m) => assert_eq!(m, dec!(25)),
            other => panic!("Expected margin target, got {other:?}"),
        }
        match pricing_target(None, Some(dec!(0.5))).unwrap() {
            PricingTarget::Markup(m) => assert_eq!(m, dec!(0.5)),
            other => panic!("Expected markup target, got {other:?}"),
        }
        assert!(pricing_target(None, None).is_err());
    }

    #[test]
    fn test_margin_and_markup_flags_conflict() {
        let cli = PriceCli::try_parse_from(["cfc", "--cost", "60", "--margin", "40"]).unwrap();
        assert_eq!(cli.args.cost, Some(dec!(60)));
        assert_eq!(cli.args.digits, DEFAULT_ROUNDING_DIGITS);
        assert!(
            PriceCli::try_parse_from(["cfc", "--cost", "60", "--margin", "40", "--markup", "50"])
                .is_err()
        );
    }
}
