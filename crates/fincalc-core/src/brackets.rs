use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, TaxBracket};

/// One bracket's share of an income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketAllocation {
    pub bracket_index: usize,
    pub bracket_name: String,
    pub from: Money,
    pub to: Option<Money>,
    pub rate: Rate,
    pub amount_in_bracket: Money,
    pub tax_on_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTax {
    pub total_tax: Money,
    pub allocations: Vec<BracketAllocation>,
    /// Rate of the highest bracket that taxed a positive amount.
    pub marginal_rate: Rate,
}

/// Allocate `income` across ascending brackets.
///
/// Walks the brackets in order. The first bracket whose lower bound the income
/// does not exceed gets a zero allocation and ends the walk, so brackets above
/// the income are never emitted. An unbounded bracket is measured up to the
/// income itself.
pub fn allocate(income: Money, brackets: &[TaxBracket]) -> BracketTax {
    let mut total_tax = Decimal::ZERO;
    let mut marginal_rate = Decimal::ZERO;
    let mut allocations = Vec::with_capacity(brackets.len());

    for (index, bracket) in brackets.iter().enumerate() {
        if income <= bracket.from {
            allocations.push(zero_allocation(index, bracket));
            break;
        }

        let upper = bracket.to.unwrap_or(income);
        let taxable = upper.min(income) - bracket.from;

        if taxable > Decimal::ZERO {
            let tax_on_amount = taxable * bracket.rate;
            total_tax += tax_on_amount;
            marginal_rate = bracket.rate;
            allocations.push(BracketAllocation {
                bracket_index: index,
                bracket_name: bracket_name(index),
                from: bracket.from,
                to: bracket.to,
                rate: bracket.rate,
                amount_in_bracket: taxable,
                tax_on_amount,
            });
        } else {
            allocations.push(zero_allocation(index, bracket));
        }
    }

    BracketTax {
        total_tax,
        allocations,
        marginal_rate,
    }
}

fn zero_allocation(index: usize, bracket: &TaxBracket) -> BracketAllocation {
    BracketAllocation {
        bracket_index: index,
        bracket_name: bracket_name(index),
        from: bracket.from,
        to: bracket.to,
        rate: bracket.rate,
        amount_in_bracket: Decimal::ZERO,
        tax_on_amount: Decimal::ZERO,
    }
}

fn bracket_name(index: usize) -> String {
    format!("Bracket {}", index + 1)
}
