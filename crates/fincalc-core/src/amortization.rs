use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

const ROOT_TOLERANCE: Decimal = dec!(0.0000000000001);
const MAX_ROOT_ITERATIONS: u32 = 40;

/// Principal, interest and closing balance aggregated over one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationScheduleItem {
    pub year: u32,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// Fixed periodic payment of a fully amortising loan (standard annuity).
///
/// A zero rate degenerates to straight-line repayment.
pub fn level_payment(principal: Money, periodic_rate: Rate, periods: u32) -> FinCalcResult<Money> {
    if periods == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "periods".into(),
            reason: "Number of payments must be > 0".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let factor = compound_factor(periodic_rate, periods)?;
    let denominator = Decimal::ONE - Decimal::ONE / factor;
    if denominator.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    let interest_only = principal
        .checked_mul(periodic_rate)
        .ok_or_else(|| overflow("principal * periodic_rate"))?;
    Ok(interest_only / denominator)
}

/// Largest principal a fixed periodic payment can amortise (inverse annuity).
pub fn principal_for_payment(payment: Money, periodic_rate: Rate, periods: u32) -> FinCalcResult<Money> {
    if periodic_rate.is_zero() {
        return Ok(payment * Decimal::from(periods));
    }

    let factor = compound_factor(periodic_rate, periods)?;
    if factor.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "inverse annuity discount factor".into(),
        });
    }

    Ok(payment * (Decimal::ONE - Decimal::ONE / factor) / periodic_rate)
}

/// Simple periodic rate from an annual percentage (5.0 = 5%).
pub fn nominal_periodic_rate(annual_rate_pct: Rate, periods_per_year: u32) -> Rate {
    annual_rate_pct / dec!(100) / Decimal::from(periods_per_year)
}

/// Periodic rate for a nominal annual rate compounded semi-annually.
///
/// `annual_rate` is a fraction (0.05 = 5%). The effective annual rate
/// `(1 + r/2)^2 - 1` is spread over `periods_per_year` equivalent periods.
pub fn semi_annual_periodic_rate(annual_rate: Rate, periods_per_year: u32) -> FinCalcResult<Rate> {
    if periods_per_year == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "payments_per_year".into(),
            reason: "Payments per year must be > 0".into(),
        });
    }

    let half = Decimal::ONE + annual_rate / dec!(2);
    let growth = half.checked_mul(half).ok_or_else(|| overflow("(1 + rate / 2)^2"))?;

    Ok(nth_root(growth, periods_per_year)? - Decimal::ONE)
}

/// Build the year-by-year schedule for a fixed-payment loan.
///
/// The final year may hold fewer than `periods_per_year` payments. No payment
/// repays more principal than is outstanding, and the schedule ends early
/// once the loan is repaid.
pub fn schedule(
    principal: Money,
    periodic_rate: Rate,
    payment: Money,
    total_periods: u32,
    years: u32,
    periods_per_year: u32,
) -> Vec<AmortizationScheduleItem> {
    let mut items = Vec::new();
    let mut balance = principal;

    for year in 1..=years {
        let mut yearly_principal = Decimal::ZERO;
        let mut yearly_interest = Decimal::ZERO;

        let elapsed = (year - 1).saturating_mul(periods_per_year);
        let payments_in_year = periods_per_year.min(total_periods.saturating_sub(elapsed));

        for _ in 0..payments_in_year {
            if balance <= Decimal::ZERO {
                break;
            }
            let interest = balance * periodic_rate;
            let principal_paid = (payment - interest).min(balance);

            yearly_interest += interest;
            yearly_principal += principal_paid;
            balance -= principal_paid;
        }

        items.push(AmortizationScheduleItem {
            year,
            principal: yearly_principal,
            interest: yearly_interest,
            balance: balance.max(Decimal::ZERO),
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    items
}

fn compound_factor(periodic_rate: Rate, periods: u32) -> FinCalcResult<Decimal> {
    (Decimal::ONE + periodic_rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| FinCalcError::InvalidInput {
            field: "periodic_rate".into(),
            reason: format!("(1 + rate)^{periods} overflows"),
        })
}

fn overflow(expression: &str) -> FinCalcError {
    FinCalcError::InvalidInput {
        field: "periodic_rate".into(),
        reason: format!("{expression} overflows"),
    }
}

/// Compute base^n for a positive integer exponent via iterative multiplication.
fn iterative_pow(base: Decimal, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

/// Compute the nth root of x using Newton's method.
fn nth_root(x: Decimal, n: u32) -> FinCalcResult<Decimal> {
    if x == Decimal::ONE || x.is_zero() || n == 1 {
        return Ok(x);
    }

    let n_dec = Decimal::from(n);
    let mut guess = Decimal::ONE;

    for _ in 0..MAX_ROOT_ITERATIONS {
        let g_n_minus_1 =
            iterative_pow(guess, n - 1).ok_or_else(|| overflow("root iteration"))?;
        if g_n_minus_1.is_zero() {
            break;
        }

        let g_n = g_n_minus_1
            .checked_mul(guess)
            .ok_or_else(|| overflow("root iteration"))?;
        let delta = (g_n - x) / (n_dec * g_n_minus_1);
        guess -= delta;

        if delta.abs() < ROOT_TOLERANCE {
            break;
        }
    }

    Ok(guess)
}
