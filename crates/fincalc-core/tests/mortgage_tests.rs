use fincalc_core::mortgage::{australia, canada, france, south_africa, uk, FeeLabel};
use fincalc_core::{CalculationRequest, FinCalcError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

// ===========================================================================
// Request documents
// ===========================================================================

fn canada_rules() -> canada::CanadaMortgageRules {
    serde_json::from_value(json!({
        "mortgage_insurance": {
            "required_below_ltv": "0.80",
            "premium_rates": [
                { "max_ltv": "0.85", "rate": "0.028" },
                { "max_ltv": "0.90", "rate": "0.031" },
                { "max_ltv": "0.95", "rate": "0.04" }
            ],
            "premium_added_to_loan": true
        },
        "interest": { "compounding": "SEMI_ANNUAL" },
        "payment_frequency_rules": {
            "monthly": { "payments_per_year": 12 },
            "bi_weekly": { "payments_per_year": 26 },
            "accelerated_bi_weekly": { "payments_per_year": 26, "acceleration": true }
        }
    }))
    .unwrap()
}

fn canada_input() -> canada::CanadaMortgageInput {
    serde_json::from_value(json!({
        "property_price": "600000",
        "down_payment": "120000",
        "interest_rate": "5",
        "amortization_years": 25,
        "payment_frequency": "MONTHLY"
    }))
    .unwrap()
}

fn australia_request() -> CalculationRequest<australia::AustraliaMortgageInput, australia::AustraliaMortgageRules> {
    serde_json::from_value(json!({
        "input": {
            "property_price": "600000",
            "down_payment": "120000",
            "annual_interest_rate": "6",
            "amortization_years": 30,
            "payment_frequency": "MONTHLY"
        },
        "rules": {
            "lenders_mortgage_insurance": {
                "required_above_lvr": "0.80",
                "premium_rates": [
                    { "max_lvr": "0.85", "rate": "0.008" },
                    { "max_lvr": "0.90", "rate": "0.012" },
                    { "max_lvr": "0.95", "rate": "0.025" }
                ],
                "premium_added_to_loan": false
            },
            "stamp_duty": {
                "brackets": [
                    { "up_to": "14000", "rate": "0.014" },
                    { "up_to": "30000", "rate": "0.024" },
                    { "up_to": "80000", "rate": "0.05" },
                    { "above": "80000", "rate": "0.06" }
                ]
            }
        }
    }))
    .unwrap()
}

fn uk_request(rate: &str) -> CalculationRequest<uk::UkMortgageInput, uk::UkMortgageRules> {
    serde_json::from_value(json!({
        "input": {
            "property_price": "400000",
            "down_payment": "80000",
            "annual_interest_rate": rate,
            "amortization_years": 25
        },
        "rules": {
            "stamp_duty": {
                "standard_brackets": [
                    { "up_to": "250000", "rate": "0" },
                    { "up_to": "925000", "rate": "0.05" },
                    { "up_to": "1500000", "rate": "0.10" },
                    { "above": "1500000", "rate": "0.12" }
                ],
                "first_time_buyer": {
                    "brackets": [
                        { "up_to": "425000", "rate": "0" },
                        { "up_to": "625000", "rate": "0.05" }
                    ],
                    "max_eligible_property_price": "625000"
                }
            }
        }
    }))
    .unwrap()
}

fn south_africa_rules() -> south_africa::SouthAfricaMortgageRules {
    serde_json::from_value(json!({
        "loan_constraints": { "max_debt_to_income_percent": "30" },
        "fees": {
            "bond_registration_percent": "1.2",
            "transfer_duty": {
                "brackets": [
                    { "up_to": "1100000", "rate": "0" },
                    { "up_to": "1512500", "rate": "0.03" },
                    { "above": "1512500", "rate": "0.06" }
                ]
            }
        }
    }))
    .unwrap()
}

fn france_rules() -> france::FranceMortgageRules {
    serde_json::from_value(json!({
        "max_debt_ratio": "0.35",
        "max_loan_duration_years": 25,
        "max_loan_duration_new_build_years": 27,
        "min_down_payment_rate": "0.10",
        "insurance": { "average_rate": "0.003", "included_in_debt_ratio": true },
        "fees": {
            "notary_rate_old_property": "0.075",
            "notary_rate_new_property": "0.025",
            "bank_fees_rate": "0.01"
        },
        "stress_test": { "interest_rate_buffer": "1" }
    }))
    .unwrap()
}

// ===========================================================================
// Canada
// ===========================================================================

#[test]
fn test_canada_insurance_boundary_at_eighty_percent() {
    let out = canada::calculate_mortgage(&canada_input(), &canada_rules()).unwrap();
    let r = &out.result;

    assert_eq!(r.loan_amount, dec!(480000));
    assert_eq!(r.loan_to_value, dec!(0.8));
    // not above the threshold, so no premium
    assert_eq!(r.insurance_premium, dec!(0));
    assert_eq!(r.total_mortgage, dec!(480000));
    assert_eq!(r.other_fees.monthly_insurance_fees.label, FeeLabel::InsurancePremium);
}

#[test]
fn test_canada_insurance_triggered_by_lower_threshold() {
    let mut rules = canada_rules();
    rules.mortgage_insurance.required_below_ltv = dec!(0.79);

    let r = canada::calculate_mortgage(&canada_input(), &rules).unwrap().result;
    assert_eq!(r.insurance_premium, dec!(13440));
    assert_eq!(r.total_mortgage, dec!(493440));
}

#[test]
fn test_canada_rejects_other_compounding() {
    let mut rules = canada_rules();
    rules.interest.compounding = fincalc_core::mortgage::Compounding::Annual;

    let err = canada::calculate_mortgage(&canada_input(), &rules).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported compounding mode: ANNUAL");
}

// ===========================================================================
// Australia
// ===========================================================================

#[test]
fn test_australia_schedule_amortizes_to_zero() {
    let request = australia_request();
    let r = australia::calculate_mortgage(&request.input, &request.rules)
        .unwrap()
        .result;

    assert_eq!(r.amortization_schedule.len(), 30);
    for pair in r.amortization_schedule.windows(2) {
        assert!(pair[1].balance < pair[0].balance, "balance must fall every year");
    }

    let last = r.amortization_schedule.last().unwrap();
    assert_eq!(last.year, 30);
    assert_close(last.balance, dec!(0), dec!(0.01), "final balance");

    let repaid: Decimal = r.amortization_schedule.iter().map(|y| y.principal).sum();
    assert_close(repaid, r.loan_amount, dec!(0.01), "principal repaid");
    assert_close(r.payment_amount, dec!(2877.84), dec!(0.01), "monthly payment");
}

// ===========================================================================
// UK
// ===========================================================================

#[test]
fn test_uk_standard_purchase() {
    let request = uk_request("5");
    let out = uk::calculate_mortgage(&request.input, &request.rules).unwrap();
    let r = &out.result;

    assert_eq!(r.loan_amount, dec!(320000));
    assert_eq!(r.ltv_percent, dec!(80));
    assert_eq!(r.stamp_duty, dec!(7500));
    assert!(!r.first_time_buyer_relief);
    assert_close(r.monthly_payment, dec!(1870.69), dec!(0.01), "monthly payment");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_uk_zero_rate_is_straight_line() {
    let request = uk_request("0");
    let r = uk::calculate_mortgage(&request.input, &request.rules).unwrap().result;

    // 320000 over 300 months
    assert_eq!(r.monthly_payment, dec!(320000) / dec!(300));
    assert_close(r.total_interest_paid, dec!(0), dec!(0.000001), "interest");
    assert_eq!(r.amortization_schedule.len(), 25);
    assert_close(
        r.amortization_schedule[24].balance,
        dec!(0),
        dec!(0.000001),
        "final balance",
    );
}

#[test]
fn test_uk_extreme_rate_is_near_interest_only() {
    let mut request = uk_request("217");
    request.input.down_payment = dec!(100000);
    request.input.amortization_years = 30;

    let r = uk::calculate_mortgage(&request.input, &request.rules).unwrap().result;
    // (1 + 2.17/12)^360 dwarfs one, so the payment is the first month's interest
    assert_close(r.monthly_payment, dec!(54250), dec!(0.0001), "monthly payment");
    assert!(!r.amortization_schedule.is_empty());
}

#[test]
fn test_uk_rate_too_high_to_compound_is_an_error() {
    let mut request = uk_request("400");
    request.input.amortization_years = 30;

    let err = uk::calculate_mortgage(&request.input, &request.rules).unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { .. }));
}

#[test]
fn test_uk_term_beyond_a_century_is_rejected() {
    let mut request = uk_request("0");
    request.input.amortization_years = 4_000_000_000;

    let err = uk::calculate_mortgage(&request.input, &request.rules).unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "amortization_years"));
}

// ===========================================================================
// South Africa
// ===========================================================================

#[test]
fn test_south_africa_full_deposit_is_rejected() {
    let input = south_africa::SouthAfricaMortgageInput {
        property_price: dec!(1500000),
        down_payment: dec!(1500000),
        annual_interest_rate: dec!(11.75),
        amortization_years: 20,
        gross_monthly_income: dec!(60000),
    };
    let err = south_africa::calculate_mortgage(&input, &south_africa_rules()).unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { .. }));
    assert!(err.to_string().contains("Invalid loan amount"));
}

#[test]
fn test_south_africa_negative_rate_rejected() {
    let input = south_africa::SouthAfricaMortgageInput {
        property_price: dec!(1500000),
        down_payment: dec!(150000),
        annual_interest_rate: dec!(-1),
        amortization_years: 20,
        gross_monthly_income: dec!(60000),
    };
    let err = south_africa::calculate_mortgage(&input, &south_africa_rules()).unwrap_err();
    assert!(matches!(err, FinCalcError::InvalidInput { .. }));
}

// ===========================================================================
// France
// ===========================================================================

#[test]
fn test_france_identical_calls_give_identical_envelopes() {
    let input = france::FranceMortgageInput {
        property_price: dec!(300000),
        down_payment: dec!(40000),
        net_monthly_income: dec!(5000),
        loan_duration_years: 20,
        annual_interest_rate: dec!(4),
        is_primary_residence: true,
        is_first_time_buyer: false,
        is_new_build: false,
    };
    let rules = france_rules();

    let first = france::calculate_mortgage(&input, &rules).unwrap();
    let second = france::calculate_mortgage(&input, &rules).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.result.loan_duration_years, 20);
    assert_eq!(first.result.amortization_schedule.len(), 20);
}
