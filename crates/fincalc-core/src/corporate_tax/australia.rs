use crate::types::ComputationOutput;
use crate::FinCalcResult;

use super::{calculate_by_size, CorporateTaxInput, CorporateTaxOutput, CorporateTaxRules};

/// Australian company tax: the base-rate-entity (small business) regime or
/// the general rate, chosen by `is_small_business`.
///
/// A small-business regime with a `max_turnover` condition fails with
/// `RegimeNotApplicable` when the declared turnover is above it.
pub fn calculate_corporate_tax(
    input: &CorporateTaxInput,
    rules: &CorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    calculate_by_size(
        "Australia company tax: general or base rate entity regime",
        "Small business",
        input,
        rules,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corporate_tax::{FlatRegime, Regime, RegimeConditions};
    use crate::error::FinCalcError;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn rules() -> CorporateTaxRules {
        let mut regimes = BTreeMap::new();
        regimes.insert(
            "general".to_string(),
            Regime::Flat(FlatRegime { rate: dec!(0.30), conditions: None }),
        );
        regimes.insert(
            "small_business".to_string(),
            Regime::Flat(FlatRegime {
                rate: dec!(0.25),
                conditions: Some(RegimeConditions { max_turnover: Some(dec!(50000000)) }),
            }),
        );
        CorporateTaxRules { regimes }
    }

    fn input(income: Decimal, turnover: Option<Decimal>, small: bool) -> CorporateTaxInput {
        CorporateTaxInput {
            taxable_income: income,
            annual_turnover: turnover,
            is_small_business: small,
        }
    }

    #[test]
    fn test_general_rate() {
        let out = calculate_corporate_tax(&input(dec!(1000000), None, false), &rules())
            .unwrap()
            .result;
        assert_eq!(out.corporate_tax, dec!(300000));
        assert_eq!(out.effective_tax_rate, dec!(30));
        assert_eq!(out.breakdowns[0].to, "Above");
    }

    #[test]
    fn test_small_business_rate() {
        let out = calculate_corporate_tax(
            &input(dec!(500000), Some(dec!(10000000)), true),
            &rules(),
        )
        .unwrap();
        assert_eq!(out.result.corporate_tax, dec!(125000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_turnover_above_ceiling_fails() {
        let err = calculate_corporate_tax(
            &input(dec!(500000), Some(dec!(60000000)), true),
            &rules(),
        )
        .unwrap_err();
        assert!(matches!(err, FinCalcError::RegimeNotApplicable { .. }));
    }

    #[test]
    fn test_missing_regime() {
        let mut r = rules();
        r.regimes.remove("small_business");
        let err = calculate_corporate_tax(&input(dec!(1000), None, true), &r).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tax regime: small_business");
    }
}
