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
pub struct UkIncomeTaxInput {
    pub income: Money,
}

/// Personal allowance, withdrawn at `taper_rate` per pound above the threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalAllowanceRules {
    pub amount: Money,
    pub taper_threshold: Money,
    pub taper_rate: Rate,
}

/// Class 1 employee National Insurance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NationalInsuranceRules {
    pub primary_threshold: Money,
    pub upper_earnings_limit: Money,
    pub main_rate: Rate,
    pub upper_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkIncomeTaxRules {
    /// Bands expressed on taxable income, i.e. after the personal allowance.
    pub tax_brackets: Vec<TaxBracket>,
    pub personal_allowance: PersonalAllowanceRules,
    pub national_insurance: NationalInsuranceRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkIncomeTaxOutput {
    pub gross_income: Money,
    pub personal_allowance: Money,
    pub taxable_income: Money,
    pub income_tax: Money,
    pub national_insurance: Money,
    pub total_deductions: Money,
    pub net_income: Money,
    pub effective_tax_rate: Rate,
    pub tax_bracket_breakdown: Vec<BracketAllocation>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// UK income tax after the tapered personal allowance, plus employee
/// National Insurance on gross income.
pub fn calculate_net_income(
    input: &UkIncomeTaxInput,
    rules: &UkIncomeTaxRules,
) -> FinCalcResult<ComputationOutput<UkIncomeTaxOutput>> {
    let warnings: Vec<String> = Vec::new();
    validate_income(input.income)?;

    let income = input.income;
    let policy = rounding::UK;

    let personal_allowance = tapered_allowance(income, &rules.personal_allowance);
    let taxable_income = (income - personal_allowance).max(Decimal::ZERO);

    let bracket_tax = brackets::allocate(taxable_income, &rules.tax_brackets);
    let national_insurance = national_insurance(income, &rules.national_insurance);
    let total_deductions = bracket_tax.total_tax + national_insurance;

    let output = UkIncomeTaxOutput {
        gross_income: income,
        personal_allowance,
        taxable_income,
        income_tax: policy.money(bracket_tax.total_tax),
        national_insurance: policy.money(national_insurance),
        total_deductions: policy.money(total_deductions),
        net_income: policy.money(income - total_deductions),
        effective_tax_rate: policy.rate(ratio_or_zero(bracket_tax.total_tax, income)),
        tax_bracket_breakdown: bracket_tax.allocations,
    };

    Ok(with_metadata(
        "UK income tax: tapered personal allowance, progressive bands, plus National Insurance",
        input,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

fn tapered_allowance(income: Money, rules: &PersonalAllowanceRules) -> Money {
    if income <= rules.taper_threshold {
        return rules.amount;
    }
    let reduction = ((income - rules.taper_threshold) * rules.taper_rate).floor();
    (rules.amount - reduction).max(Decimal::ZERO)
}

fn national_insurance(income: Money, rules: &NationalInsuranceRules) -> Money {
    if income <= rules.primary_threshold {
        return Decimal::ZERO;
    }
    if income <= rules.upper_earnings_limit {
        return (income - rules.primary_threshold) * rules.main_rate;
    }

    let main_band = (rules.upper_earnings_limit - rules.primary_threshold) * rules.main_rate;
    let upper_band = (income - rules.upper_earnings_limit) * rules.upper_rate;
    main_band + upper_band
}
