use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::FinCalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless a field says otherwise.
pub type Rate = Decimal;

/// A half-open income interval `[from, to)` taxed at `rate`.
/// `to = None` means the bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub from: Money,
    pub to: Option<Money>,
    pub rate: Rate,
}

/// A calculator request as it arrives from a file, stdin or a binding:
/// the caller's input together with the already-resolved rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest<I, R> {
    pub input: I,
    pub rules: R,
}

impl<I: DeserializeOwned, R: DeserializeOwned> CalculationRequest<I, R> {
    /// Build a request from separate input and rules JSON documents.
    pub fn from_json_parts(input_json: &str, rules_json: &str) -> FinCalcResult<Self> {
        Ok(Self {
            input: serde_json::from_str(input_json)?,
            rules: serde_json::from_str(rules_json)?,
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    pub fn to_json(&self) -> FinCalcResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// `numerator / denominator`, or zero when the denominator is not positive.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FinCalcError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_from_json_parts() {
        let request = CalculationRequest::<TaxBracket, TaxBracket>::from_json_parts(
            r#"{ "from": "0", "to": "12570", "rate": "0" }"#,
            r#"{ "from": "12570", "to": null, "rate": "0.20" }"#,
        )
        .unwrap();
        assert_eq!(request.input.to, Some(dec!(12570)));
        assert_eq!(request.rules.to, None);
    }

    #[test]
    fn test_malformed_rules_are_a_serialization_error() {
        let err = CalculationRequest::<TaxBracket, TaxBracket>::from_json_parts(
            r#"{ "from": "0", "to": null, "rate": "0.1" }"#,
            r#"{ "from": "0" "#,
        )
        .unwrap_err();
        assert!(matches!(err, FinCalcError::SerializationError(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_envelope_serializes_with_metadata() {
        let bracket = TaxBracket { from: dec!(0), to: None, rate: dec!(0.25) };
        let json = with_metadata("flat", &bracket, vec![], bracket.clone()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["methodology"], "flat");
        assert_eq!(value["result"]["rate"], "0.25");
        assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    }
}
