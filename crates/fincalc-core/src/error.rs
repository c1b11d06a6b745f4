use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown tax regime: {0}")]
    UnknownRegime(String),

    #[error("Unsupported regime type: {kind} (regime '{regime}')")]
    UnsupportedRegime { regime: String, kind: String },

    #[error("{regime} regime not applicable: {reason}")]
    RegimeNotApplicable { regime: String, reason: String },

    #[error("Unsupported compounding mode: {0}")]
    UnsupportedCompounding(String),

    #[error("{ratio_name} exceeds maximum insurable limit ({ratio})")]
    ExceedsInsurableLimit { ratio_name: String, ratio: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinCalcError {
    fn from(e: serde_json::Error) -> Self {
        FinCalcError::SerializationError(e.to_string())
    }
}
