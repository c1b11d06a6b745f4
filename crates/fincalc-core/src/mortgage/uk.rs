use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{
    amortize, cumulative_duty, loan_amount, validate_rate, validate_term, warn_if_term_exceeds,
    DutyBand, FeeLabel, FeeLine, OtherFees,
};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkMortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    /// Annual rate in percent.
    pub annual_interest_rate: Rate,
    pub amortization_years: u32,
    #[serde(default)]
    pub is_first_time_buyer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanConstraints {
    #[serde(default)]
    pub max_ltv_percent: Option<Rate>,
    #[serde(default)]
    pub max_amortization_years: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstTimeBuyerStampDuty {
    pub brackets: Vec<DutyBand>,
    pub max_eligible_property_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyRules {
    pub standard_brackets: Vec<DutyBand>,
    pub first_time_buyer: FirstTimeBuyerStampDuty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UkMortgageRules {
    #[serde(default)]
    pub loan_constraints: Option<LoanConstraints>,
    pub stamp_duty: StampDutyRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkMortgageOutput {
    pub loan_amount: Money,
    /// Loan over price, in percent.
    pub ltv_percent: Rate,
    pub total_mortgage: Money,
    pub monthly_payment: Money,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub stamp_duty: Money,
    pub first_time_buyer_relief: bool,
    pub amortization_schedule: Vec<AmortizationScheduleItem>,
    pub other_fees: OtherFees,
}

/// UK repayment mortgage with Stamp Duty Land Tax.
///
/// First-time buyers at or under the relief ceiling use the relief table in
/// full. Above the ceiling the standard table applies to the whole price.
pub fn calculate_mortgage(
    input: &UkMortgageInput,
    rules: &UkMortgageRules,
) -> FinCalcResult<ComputationOutput<UkMortgageOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_term("amortization_years", input.amortization_years)?;
    validate_rate(input.annual_interest_rate)?;

    let loan = loan_amount(input.property_price, input.down_payment)?;
    let ltv_percent = loan / input.property_price * dec!(100);

    if let Some(constraints) = &rules.loan_constraints {
        if let Some(max) = constraints.max_ltv_percent {
            if ltv_percent > max {
                warnings.push(format!("LTV of {ltv_percent}% exceeds the lending limit of {max}%"));
            }
        }
        warn_if_term_exceeds(
            input.amortization_years,
            constraints.max_amortization_years,
            &mut warnings,
        );
    }

    let periodic_rate =
        amortization::nominal_periodic_rate(input.annual_interest_rate, MONTHS_PER_YEAR);
    let amortized = amortize(loan, periodic_rate, input.amortization_years, MONTHS_PER_YEAR)?;

    let relief = &rules.stamp_duty.first_time_buyer;
    let first_time_buyer_relief =
        input.is_first_time_buyer && input.property_price <= relief.max_eligible_property_price;
    let bands = if first_time_buyer_relief {
        &relief.brackets
    } else {
        &rules.stamp_duty.standard_brackets
    };
    let stamp_duty = cumulative_duty(input.property_price, bands);

    let output = UkMortgageOutput {
        loan_amount: loan,
        ltv_percent,
        total_mortgage: loan,
        monthly_payment: amortized.payment,
        total_interest_paid: amortized.total_interest,
        total_paid: amortized.total_paid,
        stamp_duty,
        first_time_buyer_relief,
        amortization_schedule: amortized.schedule,
        other_fees: OtherFees {
            notary_fees: FeeLine::new(stamp_duty, FeeLabel::StampDuty),
            bank_fees: FeeLine::new(Decimal::ZERO, FeeLabel::BankFees),
            monthly_insurance_fees: FeeLine::new(Decimal::ZERO, FeeLabel::MonthlyInsuranceFees),
        },
    };

    Ok(with_metadata(
        "UK repayment mortgage: level monthly payments, SDLT with first-time buyer relief",
        input,
        warnings,
        output,
    ))
}
