use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinanceError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Percent inputs are normalised
/// with [`crate::time_value::normalize_rate`] before use.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Decimal digits every monetary output is rounded to unless overridden.
pub const DEFAULT_ROUNDING_DIGITS: u32 = 2;

/// Largest scale a `Decimal` can carry.
pub const MAX_ROUNDING_DIGITS: u32 = 28;

/// Serde default for `rounding_digits` fields.
pub fn default_rounding_digits() -> u32 {
    DEFAULT_ROUNDING_DIGITS
}

/// Named compounding frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingPeriod {
    Daily,
    Weekly,
    Biweekly,
    Semimonthly,
    #[default]
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannually,
    Annually,
    /// Once every two years.
    Biannually,
}

impl CompoundingPeriod {
    pub const ALL: [CompoundingPeriod; 10] = [
        CompoundingPeriod::Daily,
        CompoundingPeriod::Weekly,
        CompoundingPeriod::Biweekly,
        CompoundingPeriod::Semimonthly,
        CompoundingPeriod::Monthly,
        CompoundingPeriod::Bimonthly,
        CompoundingPeriod::Quarterly,
        CompoundingPeriod::Semiannually,
        CompoundingPeriod::Annually,
        CompoundingPeriod::Biannually,
    ];

    /// Number of compounding events per year.
    pub fn periods_per_year(self) -> Decimal {
        match self {
            CompoundingPeriod::Daily => dec!(365),
            CompoundingPeriod::Weekly => dec!(52),
            CompoundingPeriod::Biweekly => dec!(26),
            CompoundingPeriod::Semimonthly => dec!(24),
            CompoundingPeriod::Monthly => dec!(12),
            CompoundingPeriod::Bimonthly => dec!(6),
            CompoundingPeriod::Quarterly => dec!(4),
            CompoundingPeriod::Semiannually => dec!(2),
            CompoundingPeriod::Annually => dec!(1),
            CompoundingPeriod::Biannually => dec!(0.5),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompoundingPeriod::Daily => "daily",
            CompoundingPeriod::Weekly => "weekly",
            CompoundingPeriod::Biweekly => "biweekly",
            CompoundingPeriod::Semimonthly => "semimonthly",
            CompoundingPeriod::Monthly => "monthly",
            CompoundingPeriod::Bimonthly => "bimonthly",
            CompoundingPeriod::Quarterly => "quarterly",
            CompoundingPeriod::Semiannually => "semiannually",
            CompoundingPeriod::Annually => "annually",
            CompoundingPeriod::Biannually => "biannually",
        }
    }
}

impl fmt::Display for CompoundingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundingPeriod {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CompoundingPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| FinanceError::InvalidInput {
                field: "period".into(),
                reason: format!("Unknown compounding period '{s}'"),
            })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_per_year_table() {
        assert_eq!(CompoundingPeriod::Daily.periods_per_year(), dec!(365));
        assert_eq!(CompoundingPeriod::Semimonthly.periods_per_year(), dec!(24));
        assert_eq!(CompoundingPeriod::Bimonthly.periods_per_year(), dec!(6));
        assert_eq!(CompoundingPeriod::Biannually.periods_per_year(), dec!(0.5));
    }

    #[test]
    fn test_period_from_str_case_insensitive() {
        assert_eq!(
            "SemiAnnually".parse::<CompoundingPeriod>().unwrap(),
            CompoundingPeriod::Semiannually
        );
        assert!("fortnightly".parse::<CompoundingPeriod>().is_err());
    }

    #[test]
    fn test_period_serde_lowercase() {
        let json = serde_json::to_string(&CompoundingPeriod::Biweekly).unwrap();
        assert_eq!(json, "\"biweekly\"");
        let back: CompoundingPeriod = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(back, CompoundingPeriod::Quarterly);
    }
}
