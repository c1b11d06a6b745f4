use std::collections::BTreeMap;

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
pub struct CanadaIncomeTaxInput {
    pub income: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditType {
    NonRefundable,
    Refundable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCredit {
    pub amount: Money,
    #[serde(rename = "type")]
    pub credit_type: CreditType,
    pub rate: Rate,
}

/// Canada Pension Plan: `rate` on income above the basic exemption, capped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CppContribution {
    pub rate: Rate,
    pub max_contribution: Money,
    pub exemption: Money,
}

/// Employment Insurance: `rate` on insurable earnings, capped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EiContribution {
    pub rate: Rate,
    pub max_insurable_earnings: Money,
    pub max_contribution: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contributions {
    #[serde(default)]
    pub cpp: Option<CppContribution>,
    #[serde(default)]
    pub ei: Option<EiContribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanadaIncomeTaxRules {
    pub tax_brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub credits: BTreeMap<String, TaxCredit>,
    #[serde(default)]
    pub contributions: Contributions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanadaIncomeTaxOutput {
    pub gross_income: Money,
    pub gross_tax: Money,
    pub total_credits: Money,
    pub income_tax: Money,
    pub cpp: Money,
    pub ei: Money,
    pub total_deductions: Money,
    pub net_income: Money,
    /// Net income tax over gross income, as a fraction.
    pub effective_tax_rate: Rate,
    pub tax_bracket_breakdown: Vec<BracketAllocation>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Federal income tax, CPP and EI for a Canadian employee.
///
/// Credits are valued at `amount * rate` and reduce gross bracket tax, never
/// below zero. CPP and EI are computed on gross income independently of the
/// income tax.
pub fn calculate_net_income(
    input: &CanadaIncomeTaxInput,
    rules: &CanadaIncomeTaxRules,
) -> FinCalcResult<ComputationOutput<CanadaIncomeTaxOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_income(input.income)?;

    let income = input.income;
    let policy = rounding::CANADA;

    let bracket_tax = brackets::allocate(income, &rules.tax_brackets);
    let total_credits = credit_value(&rules.credits);
    let net_tax = (bracket_tax.total_tax - total_credits).max(Decimal::ZERO);

    if total_credits > bracket_tax.total_tax && income > Decimal::ZERO {
        warnings.push(format!(
            "Credits of {} exceed gross tax of {}; the excess is not refunded",
            total_credits, bracket_tax.total_tax
        ));
    }

    let cpp = cpp_contribution(income, rules.contributions.cpp.as_ref());
    let ei = ei_premium(income, rules.contributions.ei.as_ref());
    let total_deductions = net_tax + cpp + ei;

    let output = CanadaIncomeTaxOutput {
        gross_income: income,
        gross_tax: policy.money(bracket_tax.total_tax),
        total_credits: policy.money(total_credits),
        income_tax: policy.money(net_tax),
        cpp: policy.money(cpp),
        ei: policy.money(ei),
        total_deductions: policy.money(total_deductions),
        net_income: policy.money(income - total_deductions),
        effective_tax_rate: policy.rate(ratio_or_zero(net_tax, income)),
        tax_bracket_breakdown: bracket_tax.allocations,
    };

    Ok(with_metadata(
        "Canada federal income tax: progressive brackets less credits, plus CPP and EI",
        input,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

fn credit_value(credits: &BTreeMap<String, TaxCredit>) -> Money {
    credits.values().map(|c| c.amount * c.rate).sum()
}

fn cpp_contribution(income: Money, cpp: Option<&CppContribution>) -> Money {
    match cpp {
        Some(cpp) if income > cpp.exemption => {
            ((income - cpp.exemption) * cpp.rate).min(cpp.max_contribution)
        }
        _ => Decimal::ZERO,
    }
}

fn ei_premium(income: Money, ei: Option<&EiContribution>) -> Money {
    match ei {
        Some(ei) => (income.min(ei.max_insurable_earnings) * ei.rate).min(ei.max_contribution),
        None => Decimal::ZERO,
    }
}
