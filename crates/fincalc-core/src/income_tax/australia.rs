use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::brackets::{self, BracketAllocation};
use crate::rounding;
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate, TaxBracket};
use crate::FinCalcResult;

use super::validate_income;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AustraliaIncomeTaxInput {
    pub income: Money,
    #[serde(default = "default_true")]
    pub is_resident: bool,
    #[serde(default = "default_true")]
    pub include_medicare_levy: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicareLevyRules {
    pub rate: Rate,
    pub shading_in_threshold: Money,
    pub full_levy_threshold: Money,
    pub reduction_rate: Rate,
}

/// A tax offset paid in full up to `phase_out_start` and withdrawn at
/// `phase_out_rate` until it reaches zero at `phase_out_end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxOffset {
    pub max_offset: Money,
    pub phase_out_start: Money,
    pub phase_out_end: Money,
    pub phase_out_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AustraliaIncomeTaxRules {
    pub tax_brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub non_resident_tax_brackets: Option<Vec<TaxBracket>>,
    pub medicare_levy: MedicareLevyRules,
    pub low_income_tax_offset: TaxOffset,
    #[serde(default)]
    pub low_and_middle_income_tax_offset: Option<TaxOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AustraliaIncomeTaxOutput {
    pub gross_income: Money,
    pub gross_tax: Money,
    pub low_income_tax_offset: Money,
    pub low_and_middle_income_tax_offset: Money,
    pub income_tax: Money,
    pub medicare_levy: Money,
    pub total_deductions: Money,
    pub net_income: Money,
    pub effective_tax_rate: Rate,
    pub tax_bracket_breakdown: Vec<BracketAllocation>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Australian income tax, offsets and Medicare levy.
///
/// Residents use the resident scale, receive LITO (and LMITO when the rules
/// define it) and pay the Medicare levy unless `include_medicare_levy` is
/// false. Non-residents use `non_resident_tax_brackets` when supplied and get
/// neither offsets nor the levy.
pub fn calculate_net_income(
    input: &AustraliaIncomeTaxInput,
    rules: &AustraliaIncomeTaxRules,
) -> FinCalcResult<ComputationOutput<AustraliaIncomeTaxOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_income(input.income)?;

    let income = input.income;
    let policy = rounding::AUSTRALIA;

    let scale = match (&rules.non_resident_tax_brackets, input.is_resident) {
        (_, true) => &rules.tax_brackets,
        (Some(non_resident), false) => non_resident,
        (None, false) => {
            warnings.push(
                "No non-resident tax scale in rules; resident brackets applied".to_string(),
            );
            &rules.tax_brackets
        }
    };
    let bracket_tax = brackets::allocate(income, scale);

    let (lito, lmito) = if input.is_resident {
        (
            offset_amount(income, &rules.low_income_tax_offset),
            rules
                .low_and_middle_income_tax_offset
                .as_ref()
                .map_or(Decimal::ZERO, |o| offset_amount(income, o)),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    let income_tax = (bracket_tax.total_tax - lito - lmito).max(Decimal::ZERO);

    let medicare_levy = if input.is_resident && input.include_medicare_levy {
        medicare_levy(income, &rules.medicare_levy)
    } else {
        Decimal::ZERO
    };
    let total_deductions = income_tax + medicare_levy;

    let output = AustraliaIncomeTaxOutput {
        gross_income: income,
        gross_tax: policy.money(bracket_tax.total_tax),
        low_income_tax_offset: policy.money(lito),
        low_and_middle_income_tax_offset: policy.money(lmito),
        income_tax: policy.money(income_tax),
        medicare_levy: policy.money(medicare_levy),
        total_deductions: policy.money(total_deductions),
        net_income: policy.money(income - total_deductions),
        effective_tax_rate: policy.rate(ratio_or_zero(income_tax, income)),
        tax_bracket_breakdown: bracket_tax.allocations,
    };

    Ok(with_metadata(
        "Australia income tax: progressive brackets less LITO/LMITO, plus Medicare levy",
        input,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

fn offset_amount(income: Money, offset: &TaxOffset) -> Money {
    if income <= offset.phase_out_start {
        return offset.max_offset;
    }
    if income >= offset.phase_out_end {
        return Decimal::ZERO;
    }
    let reduction = (income - offset.phase_out_start) * offset.phase_out_rate;
    (offset.max_offset - reduction).max(Decimal::ZERO)
}

fn medicare_levy(income: Money, rules: &MedicareLevyRules) -> Money {
    if income <= rules.shading_in_threshold {
        Decimal::ZERO
    } else if income <= rules.full_levy_threshold {
        (income - rules.shading_in_threshold) * rules.reduction_rate
    } else {
        income * rules.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn rules() -> AustraliaIncomeTaxRules {
        AustraliaIncomeTaxRules {
            tax_brackets: vec![
                TaxBracket { from: dec!(0), to: Some(dec!(18200)), rate: dec!(0) },
                TaxBracket { from: dec!(18200), to: Some(dec!(45000)), rate: dec!(0.19) },
                TaxBracket { from: dec!(45000), to: Some(dec!(120000)), rate: dec!(0.325) },
                TaxBracket { from: dec!(120000), to: Some(dec!(180000)), rate: dec!(0.37) },
                TaxBracket { from: dec!(180000), to: None, rate: dec!(0.45) },
            ],
            non_resident_tax_brackets: Some(vec![
                TaxBracket { from: dec!(0), to: Some(dec!(120000)), rate: dec!(0.325) },
                TaxBracket { from: dec!(120000), to: Some(dec!(180000)), rate: dec!(0.37) },
                TaxBracket { from: dec!(180000), to: None, rate: dec!(0.45) },
            ]),
            medicare_levy: MedicareLevyRules {
                rate: dec!(0.02),
                shading_in_threshold: dec!(26000),
                full_levy_threshold: dec!(32500),
                reduction_rate: dec!(0.1),
            },
            low_income_tax_offset: TaxOffset {
                max_offset: dec!(700),
                phase_out_start: dec!(37500),
                phase_out_end: dec!(45000),
                phase_out_rate: dec!(0.05),
            },
            low_and_middle_income_tax_offset: None,
        }
    }

    fn resident(income: Decimal) -> AustraliaIncomeTaxInput {
        AustraliaIncomeTaxInput { income, is_resident: true, include_medicare_levy: true }
    }

    #[test]
    fn test_lito_phase_out() {
        let offset = rules().low_income_tax_offset;
        assert_eq!(offset_amount(dec!(30000), &offset), dec!(700));
        assert_eq!(offset_amount(dec!(40000), &offset), dec!(575));
        assert_eq!(offset_amount(dec!(45000), &offset), dec!(0));
    }

    #[test]
    fn test_medicare_shading_band() {
        let levy = rules().medicare_levy;
        assert_eq!(medicare_levy(dec!(25000), &levy), dec!(0));
        assert_eq!(medicare_levy(dec!(28000), &levy), dec!(200));
        assert_eq!(medicare_levy(dec!(60000), &levy), dec!(1200));
    }

    #[test]
    fn test_low_income_with_offset() {
        let out = calculate_net_income(&resident(dec!(30000)), &rules()).unwrap().result;
        assert_eq!(out.low_income_tax_offset, dec!(700));
        assert_eq!(out.income_tax, dec!(1542));
    }

    #[test]
    fn test_non_resident_scale_without_offsets_or_levy() {
        let input = AustraliaIncomeTaxInput {
            income: dec!(60000),
            is_resident: false,
            include_medicare_levy: true,
        };
        let out = calculate_net_income(&input, &rules()).unwrap();
        assert_eq!(out.result.income_tax, dec!(19500));
        assert_eq!(out.result.medicare_levy, dec!(0));
        assert_eq!(out.result.low_income_tax_offset, dec!(0));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_non_resident_falls_back_to_resident_scale() {
        let mut r = rules();
        r.non_resident_tax_brackets = None;
        let input = AustraliaIncomeTaxInput {
            income: dec!(60000),
            is_resident: false,
            include_medicare_levy: true,
        };
        let out = calculate_net_income(&input, &r).unwrap();
        assert_eq!(out.result.income_tax, dec!(9967));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_medicare_can_be_excluded() {
        let input = AustraliaIncomeTaxInput {
            income: dec!(60000),
            is_resident: true,
            include_medicare_levy: false,
        };
        let out = calculate_net_income(&input, &rules()).unwrap().result;
        assert_eq!(out.medicare_levy, dec!(0));
        assert_eq!(out.total_deductions, dec!(9967));
    }

    #[test]
    fn test_lmito_stacks_with_lito() {
        let mut r = rules();
        r.low_and_middle_income_tax_offset = Some(TaxOffset {
            max_offset: dec!(675),
            phase_out_start: dec!(90000),
            phase_out_end: dec!(126000),
            phase_out_rate: dec!(0.03),
        });
        let out = calculate_net_income(&resident(dec!(40000)), &r).unwrap().result;
        // gross 4142, LITO 575, LMITO 675
        assert_eq!(out.low_and_middle_income_tax_offset, dec!(675));
        assert_eq!(out.income_tax, dec!(2892));
    }
}
