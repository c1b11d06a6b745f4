//! Residential mortgage calculators.
//!
//! Each jurisdiction derives the financed principal (loan plus any folded-in
//! insurance premium), runs the shared amortization engine and reports its
//! purchase costs as three labelled fee lines. Interest rates on inputs are
//! annual percentages (5.0 = 5%).

pub mod australia;
pub mod canada;
pub mod france;
pub mod south_africa;
pub mod uk;

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// Longest loan term any calculator will amortize.
pub const MAX_TERM_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeLabel {
    NotaryFees,
    BankFees,
    InsurancePremium,
    MonthlyInsuranceFees,
    StampDuty,
    LmiPremium,
    BondRegistrationFees,
    TransferDuty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLine {
    pub value: Money,
    pub label: FeeLabel,
}

impl FeeLine {
    pub fn new(value: Money, label: FeeLabel) -> Self {
        Self { value, label }
    }
}

/// Three fixed slots. What each slot holds depends on the jurisdiction, the
/// label says what it actually is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherFees {
    pub notary_fees: FeeLine,
    pub bank_fees: FeeLine,
    pub monthly_insurance_fees: FeeLine,
}

// ---------------------------------------------------------------------------
// Duty bands
// ---------------------------------------------------------------------------

/// One band of a stamp/transfer duty table: `up_to` taxes the slice from the
/// previous limit to this one, `above` taxes everything over its threshold
/// and ends the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DutyBand {
    UpTo { up_to: Money, rate: Rate },
    Above { above: Money, rate: Rate },
}

pub fn cumulative_duty(price: Money, bands: &[DutyBand]) -> Money {
    let mut duty = Decimal::ZERO;
    let mut previous_limit = Decimal::ZERO;

    for band in bands {
        match *band {
            DutyBand::UpTo { up_to, rate } => {
                if price > previous_limit {
                    duty += (price.min(up_to) - previous_limit) * rate;
                    previous_limit = up_to;
                }
            }
            DutyBand::Above { above, rate } => {
                if price > above {
                    duty += (price - above) * rate;
                    break;
                }
            }
        }
    }

    duty
}

// ---------------------------------------------------------------------------
// Mortgage insurance
// ---------------------------------------------------------------------------

/// A premium band: loans whose ratio is at or below `ceiling` pay `rate`
/// on the loan amount.
pub trait PremiumTier {
    fn ceiling(&self) -> Rate;
    fn rate(&self) -> Rate;
}

/// Premium from the first tier whose ceiling covers `ratio`. Tiers are
/// searched in the order given.
pub fn tiered_premium<T: PremiumTier>(
    loan_amount: Money,
    ratio: Rate,
    tiers: &[T],
    ratio_name: &str,
) -> FinCalcResult<Money> {
    tiers
        .iter()
        .find(|tier| ratio <= tier.ceiling())
        .map(|tier| loan_amount * tier.rate())
        .ok_or_else(|| FinCalcError::ExceedsInsurableLimit {
            ratio_name: ratio_name.to_string(),
            ratio,
        })
}

// ---------------------------------------------------------------------------
// Rates and schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compounding {
    SemiAnnual,
    Annual,
    Monthly,
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::SemiAnnual => "SEMI_ANNUAL",
            Compounding::Annual => "ANNUAL",
            Compounding::Monthly => "MONTHLY",
        };
        f.write_str(name)
    }
}

/// Level-payment figures for one loan.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Amortized {
    pub payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationScheduleItem>,
}

pub(crate) fn amortize(
    principal: Money,
    periodic_rate: Rate,
    years: u32,
    periods_per_year: u32,
) -> FinCalcResult<Amortized> {
    let total_periods = years.saturating_mul(periods_per_year);
    let payment = amortization::level_payment(principal, periodic_rate, total_periods)?;
    let total_paid = payment
        .checked_mul(Decimal::from(total_periods))
        .ok_or_else(|| FinCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Total amount paid overflows".into(),
        })?;

    Ok(Amortized {
        payment,
        total_paid,
        total_interest: total_paid - principal,
        schedule: amortization::schedule(
            principal,
            periodic_rate,
            payment,
            total_periods,
            years,
            periods_per_year,
        ),
    })
}

/// Amortize with a payment fixed by the caller, larger than the level
/// payment for the term. The loan is repaid early and the totals come from
/// the schedule.
pub(crate) fn amortize_with_payment(
    principal: Money,
    periodic_rate: Rate,
    payment: Money,
    years: u32,
    periods_per_year: u32,
) -> Amortized {
    let total_periods = years.saturating_mul(periods_per_year);
    let schedule = amortization::schedule(
        principal,
        periodic_rate,
        payment,
        total_periods,
        years,
        periods_per_year,
    );
    let total_paid: Money = schedule.iter().map(|y| y.principal + y.interest).sum();

    Amortized {
        payment,
        total_paid,
        total_interest: total_paid - principal,
        schedule,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// `price - down_payment`, rejecting prices and loans that are not positive.
pub(crate) fn loan_amount(property_price: Money, down_payment: Money) -> FinCalcResult<Money> {
    if property_price <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "property_price".into(),
            reason: "Property price must be positive".into(),
        });
    }
    let loan = property_price - down_payment;
    if loan <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Invalid loan amount: down payment must be less than property price".into(),
        });
    }
    Ok(loan)
}

pub(crate) fn validate_term(field: &str, years: u32) -> FinCalcResult<()> {
    if years == 0 {
        return Err(FinCalcError::InvalidInput {
            field: field.into(),
            reason: "Amortization period must be at least one year".into(),
        });
    }
    if years > MAX_TERM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: field.into(),
            reason: format!("Amortization period must not exceed {MAX_TERM_YEARS} years"),
        });
    }
    Ok(())
}

pub(crate) fn validate_rate(annual_rate_pct: Rate) -> FinCalcResult<()> {
    if annual_rate_pct < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "interest_rate".into(),
            reason: "Interest rate must be non-negative".into(),
        });
    }
    Ok(())
}

pub(crate) fn warn_if_term_exceeds(years: u32, max_years: Option<u32>, warnings: &mut Vec<String>) {
    if let Some(max) = max_years {
        if years > max {
            warnings.push(format!(
                "Amortization of {years} years exceeds the maximum of {max} years"
            ));
        }
    }
}
