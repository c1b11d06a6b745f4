//! Corporate income tax.
//!
//! Rule documents describe each regime as a closed sum type: a flat rate, a
//! progressive bracket table, or the UK marginal-relief band. Jurisdictions
//! pick a regime from their rules, check any turnover ceiling, then apply it.
//! Effective rates here are percentages (0-100), unlike income tax.

pub mod australia;
pub mod canada;
pub mod france;
pub mod south_africa;
pub mod uk;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::brackets;
use crate::error::FinCalcError;
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate, TaxBracket};
use crate::FinCalcResult;

pub const GENERAL_REGIME: &str = "general";
pub const SMALL_BUSINESS_REGIME: &str = "small_business";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeConditions {
    #[serde(default)]
    pub max_turnover: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRegime {
    pub rate: Rate,
    #[serde(default)]
    pub conditions: Option<RegimeConditions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveRegime {
    pub brackets: Vec<TaxBracket>,
    #[serde(default)]
    pub conditions: Option<RegimeConditions>,
}

/// UK small profits / main rate band with marginal relief between the limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalReliefRegime {
    pub main_rate: Rate,
    pub upper_limit: Money,
    pub lower_limit: Money,
    pub standard_fraction: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Regime {
    Flat(FlatRegime),
    Progressive(ProgressiveRegime),
    MarginalRelief(MarginalReliefRegime),
}

impl Regime {
    pub fn kind(&self) -> &'static str {
        match self {
            Regime::Flat(_) => "flat",
            Regime::Progressive(_) => "progressive",
            Regime::MarginalRelief(_) => "marginal_relief",
        }
    }

    pub fn max_turnover(&self) -> Option<Money> {
        let conditions = match self {
            Regime::Flat(r) => r.conditions.as_ref(),
            Regime::Progressive(r) => r.conditions.as_ref(),
            Regime::MarginalRelief(_) => None,
        };
        conditions.and_then(|c| c.max_turnover)
    }
}

/// Regimes keyed by name (`general`, `small_business`, `LARGE`, `SBC`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateTaxRules {
    pub regimes: BTreeMap<String, Regime>,
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// Input shared by jurisdictions that choose between a general and a
/// small-business regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateTaxInput {
    pub taxable_income: Money,
    #[serde(default)]
    pub annual_turnover: Option<Money>,
    #[serde(default)]
    pub is_small_business: bool,
}

impl CorporateTaxInput {
    pub fn regime_key(&self) -> &'static str {
        if self.is_small_business {
            SMALL_BUSINESS_REGIME
        } else {
            GENERAL_REGIME
        }
    }
}

/// One line of the tax computation. Bounds are rendered as text, with
/// `"Above"` for an unbounded top band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateBreakdown {
    pub from: String,
    pub to: String,
    pub rate: Rate,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateTaxOutput {
    pub corporate_tax: Money,
    /// Percentage of taxable income (0-100).
    pub effective_tax_rate: Rate,
    pub breakdowns: Vec<CorporateBreakdown>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegimeTax {
    pub tax: Money,
    pub breakdowns: Vec<CorporateBreakdown>,
}

// ---------------------------------------------------------------------------
// Shared steps
// ---------------------------------------------------------------------------

pub(crate) fn validate_taxable_income(income: Money) -> FinCalcResult<()> {
    if income < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "taxable_income".into(),
            reason: "Taxable income must be non-negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn select_regime<'a>(rules: &'a CorporateTaxRules, key: &str) -> FinCalcResult<&'a Regime> {
    rules
        .regimes
        .get(key)
        .ok_or_else(|| FinCalcError::UnknownRegime(key.to_string()))
}

/// Enforce a regime's turnover ceiling. Without a declared turnover the
/// ceiling cannot be checked, so the caller only gets a warning.
pub(crate) fn check_turnover(
    regime: &Regime,
    label: &str,
    turnover: Option<Money>,
    warnings: &mut Vec<String>,
) -> FinCalcResult<()> {
    let Some(ceiling) = regime.max_turnover() else {
        return Ok(());
    };

    match turnover {
        Some(turnover) if turnover > ceiling => Err(FinCalcError::RegimeNotApplicable {
            regime: label.to_string(),
            reason: "turnover exceeded".into(),
        }),
        Some(_) => Ok(()),
        None => {
            warnings.push(format!(
                "{label} regime has a turnover ceiling of {ceiling} but no annual turnover was supplied"
            ));
            Ok(())
        }
    }
}

/// Apply a flat or progressive regime. Marginal relief is UK-only and is
/// rejected here.
pub(crate) fn apply_regime(key: &str, regime: &Regime, income: Money) -> FinCalcResult<RegimeTax> {
    match regime {
        Regime::Flat(flat) => Ok(flat_tax(income, flat.rate)),
        Regime::Progressive(progressive) => Ok(progressive_tax(income, &progressive.brackets)),
        Regime::MarginalRelief(_) => Err(FinCalcError::UnsupportedRegime {
            regime: key.to_string(),
            kind: regime.kind().to_string(),
        }),
    }
}

pub(crate) fn flat_tax(income: Money, rate: Rate) -> RegimeTax {
    let tax = income * rate;
    RegimeTax {
        tax,
        breakdowns: vec![CorporateBreakdown {
            from: "0".into(),
            to: "Above".into(),
            rate,
            amount: tax,
        }],
    }
}

/// Progressive tax through the shared bracket engine. Only brackets that
/// actually taxed something become breakdown lines.
pub(crate) fn progressive_tax(income: Money, table: &[TaxBracket]) -> RegimeTax {
    let allocation = brackets::allocate(income, table);
    let breakdowns = allocation
        .allocations
        .into_iter()
        .filter(|a| a.amount_in_bracket > Decimal::ZERO)
        .map(|a| CorporateBreakdown {
            from: a.from.to_string(),
            to: bound_label(a.to),
            rate: a.rate,
            amount: a.tax_on_amount,
        })
        .collect();

    RegimeTax {
        tax: allocation.total_tax,
        breakdowns,
    }
}

pub(crate) fn bound_label(bound: Option<Money>) -> String {
    bound.map_or_else(|| "Above".to_string(), |b| b.to_string())
}

pub(crate) fn effective_rate_pct(tax: Money, income: Money) -> Rate {
    ratio_or_zero(tax, income) * dec!(100)
}

pub(crate) fn into_output<I: Serialize>(
    methodology: &str,
    input: &I,
    income: Money,
    warnings: Vec<String>,
    regime_tax: RegimeTax,
) -> ComputationOutput<CorporateTaxOutput> {
    let output = CorporateTaxOutput {
        corporate_tax: regime_tax.tax,
        effective_tax_rate: effective_rate_pct(regime_tax.tax, income),
        breakdowns: regime_tax.breakdowns,
    };
    with_metadata(methodology, input, warnings, output)
}

/// Select, check and apply the regime for a general/small-business input.
pub(crate) fn calculate_by_size(
    methodology: &str,
    small_business_label: &str,
    input: &CorporateTaxInput,
    rules: &CorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_taxable_income(input.taxable_income)?;

    let key = input.regime_key();
    let regime = select_regime(rules, key)?;
    let label = if input.is_small_business {
        small_business_label
    } else {
        "General"
    };
    check_turnover(regime, label, input.annual_turnover, &mut warnings)?;

    let regime_tax = apply_regime(key, regime, input.taxable_income)?;
    Ok(into_output(
        methodology,
        input,
        input.taxable_income,
        warnings,
        regime_tax,
    ))
}
