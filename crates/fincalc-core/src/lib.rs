pub mod amortization;
pub mod brackets;
pub mod error;
pub mod rounding;
pub mod types;

#[cfg(feature = "income_tax")]
pub mod income_tax;

#[cfg(feature = "corporate_tax")]
pub mod corporate_tax;

#[cfg(feature = "mortgage")]
pub mod mortgage;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
