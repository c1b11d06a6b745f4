//! Personal income tax for each supported jurisdiction.
//!
//! Every calculator runs the shared bracket engine on (possibly adjusted)
//! income, then applies its own credits, rebates, offsets and payroll
//! contributions before deriving net income.

pub mod australia;
pub mod canada;
pub mod france;
pub mod south_africa;
pub mod uk;

use rust_decimal::Decimal;

use crate::error::FinCalcError;
use crate::types::Money;
use crate::FinCalcResult;

pub(crate) fn validate_income(income: Money) -> FinCalcResult<()> {
    if income < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "income".into(),
            reason: "Income must be non-negative".into(),
        });
    }
    Ok(())
}
