use crate::types::ComputationOutput;
use crate::FinCalcResult;

use super::{calculate_by_size, CorporateTaxInput, CorporateTaxOutput, CorporateTaxRules};

/// Canadian federal corporate tax: the small business deduction regime for
/// Canadian-controlled private corporations, or the general rate.
///
/// Rule documents usually express the small business regime as a
/// progressive table whose first band ends at the business limit.
pub fn calculate_corporate_tax(
    input: &CorporateTaxInput,
    rules: &CorporateTaxRules,
) -> FinCalcResult<ComputationOutput<CorporateTaxOutput>> {
    calculate_by_size(
        "Canada federal corporate tax: general rate or small business deduction",
        "Small business",
        input,
        rules,
    )
}
