use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::brackets::{self, BracketAllocation};
use crate::rounding;
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate, TaxBracket};
use crate::FinCalcResult;

use super::validate_income;

const SECOND_THRESHOLD_AGE: u32 = 65;
const THIRD_THRESHOLD_AGE: u32 = 75;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SouthAfricaIncomeTaxInput {
    pub income: Money,
    pub age: u32,
    /// Members on the taxpayer's medical scheme, taxpayer included.
    #[serde(default)]
    pub medical_aid_members: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rebate {
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeRebate {
    pub amount: Money,
    pub age_min: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rebates {
    pub primary: Rebate,
    pub secondary: AgeRebate,
    pub tertiary: AgeRebate,
}

/// Income at or below which no tax is payable, per age band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxThresholds {
    pub under_65: Money,
    pub age_65_to_74: Money,
    pub age_75_plus: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyMedicalCredit {
    pub taxpayer: Money,
    pub first_dependant: Money,
    pub additional_dependant: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalAidTaxCredit {
    pub monthly: MonthlyMedicalCredit,
    pub annual_multiplier: Decimal,
}

/// Unemployment Insurance Fund employee contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uif {
    pub rate: Rate,
    pub annual_income_cap: Money,
    pub max_annual_contribution: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SouthAfricaIncomeTaxRules {
    pub tax_brackets: Vec<TaxBracket>,
    pub rebates: Rebates,
    pub tax_thresholds: TaxThresholds,
    pub medical_aid_tax_credit: MedicalAidTaxCredit,
    pub uif: Uif,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SouthAfricaIncomeTaxOutput {
    pub gross_income: Money,
    pub rebate: Money,
    pub medical_aid_credit: Money,
    pub income_tax: Money,
    pub uif: Money,
    pub total_deductions: Money,
    pub net_income: Money,
    pub effective_tax_rate: Rate,
    pub tax_bracket_breakdown: Vec<BracketAllocation>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// South African personal income tax, rebates, medical scheme fees tax credit
/// and UIF.
///
/// Income at or below the age-appropriate threshold pays nothing at all: the
/// bracket engine is skipped and net income equals gross income.
pub fn calculate_net_income(
    input: &SouthAfricaIncomeTaxInput,
    rules: &SouthAfricaIncomeTaxRules,
) -> FinCalcResult<ComputationOutput<SouthAfricaIncomeTaxOutput>> {
    let warnings: Vec<String> = Vec::new();
    validate_income(input.income)?;

    let income = input.income;
    let policy = rounding::SOUTH_AFRICA;
    let methodology = "South Africa income tax: progressive brackets less age rebates and medical credit, plus UIF";

    if income <= tax_threshold(input.age, &rules.tax_thresholds) {
        let output = SouthAfricaIncomeTaxOutput {
            gross_income: income,
            rebate: Decimal::ZERO,
            medical_aid_credit: Decimal::ZERO,
            income_tax: Decimal::ZERO,
            uif: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_income: income,
            effective_tax_rate: Decimal::ZERO,
            tax_bracket_breakdown: Vec::new(),
        };
        return Ok(with_metadata(methodology, input, warnings, output));
    }

    let bracket_tax = brackets::allocate(income, &rules.tax_brackets);
    let rebate = age_rebate(input.age, &rules.rebates);
    let medical_aid_credit = medical_credit(input.medical_aid_members, &rules.medical_aid_tax_credit);
    let income_tax = (bracket_tax.total_tax - rebate - medical_aid_credit).max(Decimal::ZERO);

    let uif = (income.min(rules.uif.annual_income_cap) * rules.uif.rate)
        .min(rules.uif.max_annual_contribution);
    let total_deductions = income_tax + uif;

    let output = SouthAfricaIncomeTaxOutput {
        gross_income: income,
        rebate: policy.money(rebate),
        medical_aid_credit: policy.money(medical_aid_credit),
        income_tax: policy.money(income_tax),
        uif: policy.money(uif),
        total_deductions: policy.money(total_deductions),
        net_income: policy.money(income - total_deductions),
        effective_tax_rate: policy.rate(ratio_or_zero(income_tax, income)),
        tax_bracket_breakdown: bracket_tax.allocations,
    };

    Ok(with_metadata(methodology, input, warnings, output))
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

fn tax_threshold(age: u32, thresholds: &TaxThresholds) -> Money {
    if age >= THIRD_THRESHOLD_AGE {
        thresholds.age_75_plus
    } else if age >= SECOND_THRESHOLD_AGE {
        thresholds.age_65_to_74
    } else {
        thresholds.under_65
    }
}

/// Primary rebate always; secondary and tertiary stack once the age reaches them.
fn age_rebate(age: u32, rebates: &Rebates) -> Money {
    let mut rebate = rebates.primary.amount;
    if age >= rebates.secondary.age_min {
        rebate += rebates.secondary.amount;
    }
    if age >= rebates.tertiary.age_min {
        rebate += rebates.tertiary.amount;
    }
    rebate
}

fn medical_credit(members: u32, credit: &MedicalAidTaxCredit) -> Money {
    if members == 0 {
        return Decimal::ZERO;
    }

    let mut monthly = credit.monthly.taxpayer;
    if members >= 2 {
        monthly += credit.monthly.first_dependant;
    }
    if members > 2 {
        monthly += Decimal::from(members - 2) * credit.monthly.additional_dependant;
    }

    monthly * credit.annual_multiplier
}
