pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "interest")]
pub mod interest;

#[cfg(feature = "pricing")]
pub mod pricing;

pub use error::FinanceError;
pub use types::*;

/// Standard result type for all consumer-finance operations
pub type FinanceResult<T> = Result<T, FinanceError>;
