use fincalc_core::corporate_tax::{
    australia, canada, france, south_africa, uk, CorporateTaxInput, CorporateTaxRules,
};
use fincalc_core::{CalculationRequest, FinCalcError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

// ===========================================================================
// Rule documents
// ===========================================================================

fn australia_rules() -> CorporateTaxRules {
    serde_json::from_value(json!({
        "regimes": {
            "general": { "type": "flat", "rate": "0.30" },
            "small_business": {
                "type": "flat",
                "rate": "0.25",
                "conditions": { "max_turnover": "50000000" }
            }
        }
    }))
    .unwrap()
}

fn france_rules() -> CorporateTaxRules {
    serde_json::from_value(json!({
        "regimes": {
            "general": { "type": "flat", "rate": "0.25" },
            "small_business": {
                "type": "progressive",
                "brackets": [
                    { "from": "0", "to": "42500", "rate": "0.15" },
                    { "from": "42500", "to": null, "rate": "0.25" }
                ],
                "conditions": { "max_turnover": "10000000" }
            }
        }
    }))
    .unwrap()
}

fn south_africa_rules() -> CorporateTaxRules {
    serde_json::from_value(json!({
        "regimes": {
            "LARGE": { "type": "flat", "rate": "0.27" },
            "SBC": {
                "type": "progressive",
                "brackets": [
                    { "from": "0", "to": "95750", "rate": "0" },
                    { "from": "95750", "to": "365000", "rate": "0.07" },
                    { "from": "365000", "to": "550000", "rate": "0.21" },
                    { "from": "550000", "to": null, "rate": "0.27" }
                ],
                "conditions": { "max_turnover": "20000000" }
            }
        }
    }))
    .unwrap()
}

fn uk_request(income: &str) -> CalculationRequest<uk::UkCorporateTaxInput, uk::UkCorporateTaxRules> {
    serde_json::from_value(json!({
        "input": { "taxable_income": income },
        "rules": {
            "regimes": {
                "small_profits": { "rate": "0.19" },
                "main": { "rate": "0.25" },
                "marginal_relief": {
                    "main_rate": "0.25",
                    "upper_limit": "250000",
                    "lower_limit": "50000",
                    "standard_fraction": "0.015"
                }
            }
        }
    }))
    .unwrap()
}

fn input(income: Decimal, turnover: Option<Decimal>, small: bool) -> CorporateTaxInput {
    CorporateTaxInput {
        taxable_income: income,
        annual_turnover: turnover,
        is_small_business: small,
    }
}

// ===========================================================================
// UK marginal relief
// ===========================================================================

#[test]
fn test_uk_marginal_relief_scenario() {
    let request = uk_request("150000");
    let out = uk::calculate_corporate_tax(&request.input, &request.rules).unwrap();
    let r = &out.result;

    // 37500 gross less 0.015 * 100000 relief
    assert_eq!(r.corporate_tax, dec!(36000));
    assert_eq!(r.breakdowns.len(), 2);
    assert_eq!(r.breakdowns[0].amount, dec!(37500));
    assert_eq!(r.breakdowns[1].amount, dec!(-1500));
    let summed: Decimal = r.breakdowns.iter().map(|b| b.amount).sum();
    assert_eq!(summed, r.corporate_tax);
    assert_eq!(r.effective_tax_rate, dec!(24));
}

#[test]
fn test_uk_limits_are_inclusive() {
    let at_lower = uk_request("50000");
    let at_upper = uk_request("250000");
    let lower = uk::calculate_corporate_tax(&at_lower.input, &at_lower.rules).unwrap().result;
    let upper = uk::calculate_corporate_tax(&at_upper.input, &at_upper.rules).unwrap().result;

    assert_eq!(lower.corporate_tax, dec!(9500));
    assert_eq!(upper.corporate_tax, dec!(62500));
    assert_eq!(upper.breakdowns.len(), 1);
}

// ===========================================================================
// Turnover conditions
// ===========================================================================

#[test]
fn test_australia_turnover_ceiling_exceeded() {
    let err = australia::calculate_corporate_tax(
        &input(dec!(5000000), Some(dec!(60000000)), true),
        &australia_rules(),
    )
    .unwrap_err();

    assert!(matches!(err, FinCalcError::RegimeNotApplicable { .. }));
    assert_eq!(err.to_string(), "Small business regime not applicable: turnover exceeded");
}

#[test]
fn test_turnover_at_ceiling_is_allowed() {
    let out = australia::calculate_corporate_tax(
        &input(dec!(1000000), Some(dec!(50000000)), true),
        &australia_rules(),
    )
    .unwrap();
    assert_eq!(out.result.corporate_tax, dec!(250000));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_missing_turnover_only_warns() {
    let out = france::calculate_corporate_tax(&input(dec!(100000), None, true), &france_rules()).unwrap();
    // 42500 * 0.15 + 57500 * 0.25
    assert_eq!(out.result.corporate_tax, dec!(20750));
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Regime selection
// ===========================================================================

#[test]
fn test_south_africa_small_business_corporation() {
    let input = south_africa::SouthAfricaCorporateTaxInput {
        taxable_income: dec!(400000),
        regime: "SBC".to_string(),
        annual_turnover: Some(dec!(5000000)),
    };
    let r = south_africa::calculate_corporate_tax(&input, &south_africa_rules())
        .unwrap()
        .result;

    // 269250 * 0.07 + 35000 * 0.21
    assert_eq!(r.corporate_tax, dec!(26197.50));
    assert_eq!(r.breakdowns.len(), 3);
    assert_eq!(r.breakdowns[2].to, "550000");
}

#[test]
fn test_unknown_regime_key() {
    let input = south_africa::SouthAfricaCorporateTaxInput {
        taxable_income: dec!(400000),
        regime: "MICRO".to_string(),
        annual_turnover: None,
    };
    let err = south_africa::calculate_corporate_tax(&input, &south_africa_rules()).unwrap_err();
    assert_eq!(err.to_string(), "Unknown tax regime: MICRO");
}

#[test]
fn test_marginal_relief_outside_uk_is_unsupported() {
    let rules: CorporateTaxRules = serde_json::from_value(json!({
        "regimes": {
            "general": {
                "type": "marginal_relief",
                "main_rate": "0.25",
                "upper_limit": "250000",
                "lower_limit": "50000",
                "standard_fraction": "0.015"
            }
        }
    }))
    .unwrap();

    let err = canada::calculate_corporate_tax(&input(dec!(100000), None, false), &rules).unwrap_err();
    assert!(matches!(err, FinCalcError::UnsupportedRegime { .. }));
}

#[test]
fn test_zero_income_everywhere_is_zero_tax() {
    let request = uk_request("0");
    let uk_out = uk::calculate_corporate_tax(&request.input, &request.rules).unwrap().result;
    assert_eq!(uk_out.corporate_tax, dec!(0));
    assert!(uk_out.breakdowns.is_empty());
    assert_eq!(uk_out.effective_tax_rate, dec!(0));

    let au = australia::calculate_corporate_tax(&input(dec!(0), None, false), &australia_rules())
        .unwrap()
        .result;
    assert_eq!(au.corporate_tax, dec!(0));
    assert_eq!(au.effective_tax_rate, dec!(0));
}

#[test]
fn test_identical_calls_give_identical_envelopes() {
    let rules = france_rules();
    let i = input(dec!(250000), Some(dec!(900000)), true);
    let first = france::calculate_corporate_tax(&i, &rules).unwrap();
    let second = france::calculate_corporate_tax(&i, &rules).unwrap();
    assert_eq!(first, second);
}
