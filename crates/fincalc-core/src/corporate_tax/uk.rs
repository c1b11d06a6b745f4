use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ComputationOutput, Money};
use crate::FinCalcResult;

use super::{
    bound_label, into_output, validate_taxable_income, CorporateBreakdown, CorporateTaxOutput,
    FlatRegime, MarginalReliefRegime, RegimeTax,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkCorporateTaxInput {
    pub taxable_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkRegimes {
    pub small_profits: FlatRegime,
    pub main: FlatRegime,
    pub marginal_relief: MarginalReliefRegime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkCorporateTaxRules {
    pub regimes: UkRegimes,
}

/// UK corporation tax with marginal relief.
///
/// Profits up to the lower limit pay the small profits rate, profits at or
/// above the upper limit pay the main rate. In between, tax is the main rate
/// less `standard_fraction * (upper_limit - profits)`, reported as a gross
/// line followed by a negative relief line.
pub fn calculate_corporate_tax(
    input: &UkCorporateTaxInput,
    rules: &UkCorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    let warnings: Vec<String> = Vec::new();
    validate_taxable_income(input.taxable_income)?;

    let regime_tax = marginal_relief_tax(input.taxable_income, &rules.regimes);

    Ok(into_output(
        "UK corporation tax: small profits rate, main rate and marginal relief",
        input,
        input.taxable_income,
        warnings,
        regime_tax,
    ))
}

fn marginal_relief_tax(income: Money, regimes: &UkRegimes) -> RegimeTax {
    let band = &regimes.marginal_relief;

    if income <= Decimal::ZERO {
        return RegimeTax {
            tax: Decimal::ZERO,
            breakdowns: Vec::new(),
        };
    }

    if income <= band.lower_limit {
        let rate = regimes.small_profits.rate;
        let tax = income * rate;
        return RegimeTax {
            tax,
            breakdowns: vec![CorporateBreakdown {
                from: "0".into(),
                to: band.lower_limit.to_string(),
                rate,
                amount: tax,
            }],
        };
    }

    if income >= band.upper_limit {
        let rate = regimes.main.rate;
        let tax = income * rate;
        return RegimeTax {
            tax,
            breakdowns: vec![CorporateBreakdown {
                from: "0".into(),
                to: bound_label(None),
                rate,
                amount: tax,
            }],
        };
    }

    let gross = income * band.main_rate;
    let relief = band.standard_fraction * (band.upper_limit - income);

    RegimeTax {
        tax: gross - relief,
        breakdowns: vec![
            CorporateBreakdown {
                from: "0".into(),
                to: bound_label(None),
                rate: band.main_rate,
                amount: gross,
            },
            CorporateBreakdown {
                from: band.lower_limit.to_string(),
                to: band.upper_limit.to_string(),
                rate: -band.standard_fraction,
                amount: -relief,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn rules() -> UkCorporateTaxRules {
        UkCorporateTaxRules {
            regimes: UkRegimes {
                small_profits: FlatRegime { rate: dec!(0.19), conditions: None },
                main: FlatRegime { rate: dec!(0.25), conditions: None },
                marginal_relief: MarginalReliefRegime {
                    main_rate: dec!(0.25),
                    upper_limit: dec!(250000),
                    lower_limit: dec!(50000),
                    standard_fraction: dec!(3) / dec!(200),
                },
            },
        }
    }

    fn tax_for(income: Decimal) -> CorporateTaxOutput {
        calculate_corporate_tax(&UkCorporateTaxInput { taxable_income: income }, &rules())
            .unwrap()
            .result
    }

    #[test]
    fn test_small_profits_rate() {
        let out = tax_for(dec!(50000));
        assert_eq!(out.corporate_tax, dec!(9500));
        assert_eq!(out.effective_tax_rate, dec!(19));
        assert_eq!(out.breakdowns[0].to, "50000");
    }

    #[test]
    fn test_main_rate() {
        let out = tax_for(dec!(300000));
        assert_eq!(out.corporate_tax, dec!(75000));
        assert_eq!(out.breakdowns.len(), 1);
    }

    #[test]
    fn test_marginal_relief_band() {
        let out = tax_for(dec!(150000));
        // 37500 gross less 1500 relief
        assert_eq!(out.corporate_tax, dec!(36000));
        assert_eq!(out.breakdowns.len(), 2);
        assert_eq!(out.breakdowns[1].amount, dec!(-1500));
        assert_eq!(out.breakdowns[1].rate, dec!(-0.015));
    }

    #[test]
    fn test_zero_profit() {
        let out = tax_for(dec!(0));
        assert_eq!(out.corporate_tax, dec!(0));
        assert_eq!(out.effective_tax_rate, dec!(0));
        assert!(out.breakdowns.is_empty());
    }
}
