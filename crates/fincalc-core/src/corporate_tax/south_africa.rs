use serde::{Deserialize, Serialize};

use crate::types::{ComputationOutput, Money};
use crate::FinCalcResult;

use super::{
    apply_regime, check_turnover, into_output, select_regime, validate_taxable_income,
    CorporateTaxOutput, CorporateTaxRules,
};

/// South African companies name their regime directly, e.g. `LARGE` for the
/// standard company rate or `SBC` for a small business corporation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SouthAfricaCorporateTaxInput {
    pub taxable_income: Money,
    pub regime: String,
    #[serde(default)]
    pub annual_turnover: Option<Money>,
}

pub fn calculate_corporate_tax(
    input: &SouthAfricaCorporateTaxInput,
    rules: &CorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_taxable_income(input.taxable_income)?;

    let regime = select_regime(rules, &input.regime)?;
    check_turnover(regime, &input.regime, input.annual_turnover, &mut warnings)?;
    let regime_tax = apply_regime(&input.regime, regime, input.taxable_income)?;

    Ok(into_output(
        "South Africa company tax: named regime (standard rate or SBC table)",
        input,
        input.taxable_income,
        warnings,
        regime_tax,
    ))
}
