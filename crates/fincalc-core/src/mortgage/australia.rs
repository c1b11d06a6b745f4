use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{
    amortize, cumulative_duty, loan_amount, tiered_premium, validate_rate, validate_term,
    warn_if_term_exceeds, DutyBand, FeeLabel, FeeLine, OtherFees, PremiumTier,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AustraliaPaymentFrequency {
    Monthly,
    Fortnightly,
    Weekly,
}

impl AustraliaPaymentFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            AustraliaPaymentFrequency::Monthly => 12,
            AustraliaPaymentFrequency::Fortnightly => 26,
            AustraliaPaymentFrequency::Weekly => 52,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AustraliaMortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    /// Annual rate in percent.
    pub annual_interest_rate: Rate,
    pub amortization_years: u32,
    pub payment_frequency: AustraliaPaymentFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanConstraints {
    #[serde(default)]
    pub max_lvr: Option<Rate>,
    #[serde(default)]
    pub max_amortization_years: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LvrPremiumRate {
    pub max_lvr: Rate,
    pub rate: Rate,
}

impl PremiumTier for LvrPremiumRate {
    fn ceiling(&self) -> Rate {
        self.max_lvr
    }
    fn rate(&self) -> Rate {
        self.rate
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LendersMortgageInsuranceRules {
    pub required_above_lvr: Rate,
    pub premium_rates: Vec<LvrPremiumRate>,
    pub premium_added_to_loan: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyRules {
    pub brackets: Vec<DutyBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AustraliaMortgageRules {
    #[serde(default)]
    pub loan_constraints: Option<LoanConstraints>,
    pub lenders_mortgage_insurance: LendersMortgageInsuranceRules,
    pub stamp_duty: StampDutyRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AustraliaMortgageOutput {
    pub loan_amount: Money,
    pub loan_to_value_ratio: Rate,
    pub lmi_premium: Money,
    pub total_mortgage: Money,
    pub payment_amount: Money,
    pub payments_per_year: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub stamp_duty: Money,
    pub amortization_schedule: Vec<AmortizationScheduleItem>,
    pub other_fees: OtherFees,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Australian home loan with lenders mortgage insurance and stamp duty.
///
/// LMI applies once LVR is strictly above `required_above_lvr`, so a loan at
/// exactly the threshold pays none.
pub fn calculate_mortgage(
    input: &AustraliaMortgageInput,
    rules: &AustraliaMortgageRules,
) -> FinCalcResult<ComputationOutput<AustraliaMortgageOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_term("amortization_years", input.amortization_years)?;
    validate_rate(input.annual_interest_rate)?;

    let loan = loan_amount(input.property_price, input.down_payment)?;
    let lvr = loan / input.property_price;

    let lmi = &rules.lenders_mortgage_insurance;
    let lmi_premium = if lvr > lmi.required_above_lvr {
        tiered_premium(loan, lvr, &lmi.premium_rates, "LVR")?
    } else {
        Decimal::ZERO
    };
    let total_mortgage = if lmi.premium_added_to_loan {
        loan + lmi_premium
    } else {
        loan
    };

    if let Some(constraints) = &rules.loan_constraints {
        if let Some(max_lvr) = constraints.max_lvr {
            if lvr > max_lvr {
                warnings.push(format!("LVR of {lvr} exceeds the lending limit of {max_lvr}"));
            }
        }
        warn_if_term_exceeds(
            input.amortization_years,
            constraints.max_amortization_years,
            &mut warnings,
        );
    }

    let payments_per_year = input.payment_frequency.payments_per_year();
    let periodic_rate =
        amortization::nominal_periodic_rate(input.annual_interest_rate, payments_per_year);
    let amortized = amortize(total_mortgage, periodic_rate, input.amortization_years, payments_per_year)?;

    let stamp_duty = cumulative_duty(input.property_price, &rules.stamp_duty.brackets);

    let output = AustraliaMortgageOutput {
        loan_amount: loan,
        loan_to_value_ratio: lvr,
        lmi_premium,
        total_mortgage,
        payment_amount: amortized.payment,
        payments_per_year,
        total_interest_paid: amortized.total_interest,
        total_paid: amortized.total_paid,
        stamp_duty,
        amortization_schedule: amortized.schedule,
        other_fees: OtherFees {
            notary_fees: FeeLine::new(stamp_duty, FeeLabel::StampDuty),
            bank_fees: FeeLine::new(Decimal::ZERO, FeeLabel::BankFees),
            monthly_insurance_fees: FeeLine::new(lmi_premium, FeeLabel::LmiPremium),
        },
    };

    Ok(with_metadata(
        "Australia home loan: LMI-adjusted principal, level payments, stamp duty",
        input,
        warnings,
        output,
    ))
}
