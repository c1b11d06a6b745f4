use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::brackets::{self, BracketAllocation};
use crate::error::FinCalcError;
use crate::rounding;
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate, TaxBracket};
use crate::FinCalcResult;

use super::validate_income;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranceIncomeTaxInput {
    pub income: Money,
    /// Household parts for the quotient familial (1 for a single person).
    #[serde(default = "default_family_parts")]
    pub family_parts: Decimal,
}

fn default_family_parts() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotientFamilial {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRate {
    pub rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialContributions {
    pub employee: ContributionRate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranceIncomeTaxRules {
    pub tax_brackets: Vec<TaxBracket>,
    pub quotient_familial: QuotientFamilial,
    pub social_contributions: SocialContributions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FranceIncomeTaxOutput {
    pub gross_income: Money,
    /// Income the brackets were applied to.
    pub taxable_per_part: Money,
    pub income_tax: Money,
    pub social_contributions: Money,
    pub total_deductions: Money,
    pub net_income: Money,
    pub average_tax_rate: Rate,
    pub marginal_tax_rate: Rate,
    pub tax_bracket_breakdown: Vec<BracketAllocation>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// French income tax with the quotient familial, plus employee social
/// contributions on gross income.
///
/// With the quotient familial enabled the brackets apply to
/// `income / family_parts` and the resulting tax is multiplied back by the
/// number of parts. Disabled, the whole income is taxed once.
pub fn calculate_net_income(
    input: &FranceIncomeTaxInput,
    rules: &FranceIncomeTaxRules,
) -> FinCalcResult<ComputationOutput<FranceIncomeTaxOutput>> {
    let warnings: Vec<String> = Vec::new();
    validate_income(input.income)?;
    if input.family_parts <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "family_parts".into(),
            reason: "Family parts must be positive".into(),
        });
    }

    let income = input.income;
    let policy = rounding::FRANCE;

    let parts = if rules.quotient_familial.enabled {
        input.family_parts
    } else {
        Decimal::ONE
    };
    let taxable_per_part = income / parts;

    let bracket_tax = brackets::allocate(taxable_per_part, &rules.tax_brackets);
    let income_tax = bracket_tax.total_tax * parts;
    let social_contributions = income * rules.social_contributions.employee.rate;
    let total_deductions = income_tax + social_contributions;

    let output = FranceIncomeTaxOutput {
        gross_income: income,
        taxable_per_part,
        income_tax: policy.money(income_tax),
        social_contributions: policy.money(social_contributions),
        total_deductions: policy.money(total_deductions),
        net_income: policy.money(income - total_deductions),
        average_tax_rate: policy.rate(ratio_or_zero(income_tax, income)),
        marginal_tax_rate: bracket_tax.marginal_rate,
        tax_bracket_breakdown: bracket_tax.allocations,
    };

    Ok(with_metadata(
        "France income tax: quotient familial over progressive brackets, plus social contributions",
        input,
        warnings,
        output,
    ))
}
