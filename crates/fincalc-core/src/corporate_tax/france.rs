use crate::types::ComputationOutput;
use crate::FinCalcResult;

use super::{calculate_by_size, CorporateTaxInput, CorporateTaxOutput, CorporateTaxRules};

/// French impôt sur les sociétés. SMEs typically use a progressive regime
/// (reduced rate on a first slice of profit) gated by a turnover ceiling;
/// other companies pay the standard flat rate.
pub fn calculate_corporate_tax(
    input: &CorporateTaxInput,
    rules: &CorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    calculate_by_size(
        "France corporate tax: standard rate or SME reduced-rate regime",
        "SME",
        input,
        rules,
    )
}
