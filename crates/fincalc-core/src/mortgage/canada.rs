use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{
    amortize, amortize_with_payment, loan_amount, tiered_premium, validate_rate, validate_term, warn_if_term_exceeds,
    Compounding, FeeLabel, FeeLine, OtherFees, PremiumTier,
};

const TIERED_DOWN_PAYMENT_LIMIT: Decimal = dec!(500000);
const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanadaPaymentFrequency {
    Monthly,
    BiWeekly,
    AcceleratedBiWeekly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanadaMortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    /// Nominal annual rate in percent, compounded semi-annually.
    pub interest_rate: Rate,
    pub amortization_years: u32,
    pub payment_frequency: CanadaPaymentFrequency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinDownPayment {
    /// Share of the price up to 500 000.
    pub up_to_500k: Rate,
    /// Share of the price above 500 000.
    pub above_500k: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanConstraints {
    pub max_amortization_years: u32,
    pub insured_max_amortization_years: u32,
    pub min_down_payment: MinDownPayment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtvPremiumRate {
    pub max_ltv: Rate,
    pub rate: Rate,
}

impl PremiumTier for LtvPremiumRate {
    fn ceiling(&self) -> Rate {
        self.max_ltv
    }
    fn rate(&self) -> Rate {
        self.rate
    }
}

/// CMHC default insurance: required once LTV is above `required_below_ltv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInsuranceRules {
    pub required_below_ltv: Rate,
    pub premium_rates: Vec<LtvPremiumRate>,
    pub premium_added_to_loan: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRules {
    pub compounding: Compounding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFrequencyRule {
    pub payments_per_year: u32,
    /// Each payment is the monthly payment times `13 / payments_per_year`,
    /// so accelerated bi-weekly pays half the monthly amount.
    #[serde(default)]
    pub acceleration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFrequencyRules {
    pub monthly: PaymentFrequencyRule,
    pub bi_weekly: PaymentFrequencyRule,
    pub accelerated_bi_weekly: PaymentFrequencyRule,
}

impl PaymentFrequencyRules {
    pub fn rule_for(&self, frequency: CanadaPaymentFrequency) -> &PaymentFrequencyRule {
        match frequency {
            CanadaPaymentFrequency::Monthly => &self.monthly,
            CanadaPaymentFrequency::BiWeekly => &self.bi_weekly,
            CanadaPaymentFrequency::AcceleratedBiWeekly => &self.accelerated_bi_weekly,
        }
    }
}

/// Minimum qualifying rate test. Rates are percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestRules {
    pub apply: bool,
    pub minimum_rate_buffer: Rate,
    pub minimum_qualifying_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanadaMortgageRules {
    #[serde(default)]
    pub loan_constraints: Option<LoanConstraints>,
    pub mortgage_insurance: MortgageInsuranceRules,
    pub interest: InterestRules,
    pub payment_frequency_rules: PaymentFrequencyRules,
    #[serde(default)]
    pub stress_test: Option<StressTestRules>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanadaMortgageOutput {
    pub loan_amount: Money,
    pub loan_to_value: Rate,
    pub insurance_premium: Money,
    pub total_mortgage: Money,
    /// Payment per period at `payments_per_year` periods.
    pub payment_amount: Money,
    pub payments_per_year: u32,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    pub minimum_down_payment: Option<Money>,
    pub qualifying_rate: Option<Rate>,
    pub qualifying_payment: Option<Money>,
    pub amortization_schedule: Vec<AmortizationScheduleItem>,
    pub other_fees: OtherFees,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Canadian mortgage with CMHC insurance and semi-annual compounding.
///
/// The nominal rate is converted to its effective annual equivalent and then
/// to an equivalent rate per payment period. Only semi-annual compounding is
/// accepted. Down-payment, amortization and stress-test shortfalls are
/// reported as warnings.
pub fn calculate_mortgage(
    input: &CanadaMortgageInput,
    rules: &CanadaMortgageRules,
) -> FinCalcResult<ComputationOutput<CanadaMortgageOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_term("amortization_years", input.amortization_years)?;
    validate_rate(input.interest_rate)?;

    let loan = loan_amount(input.property_price, input.down_payment)?;
    let ltv = loan / input.property_price;

    let insurance = &rules.mortgage_insurance;
    let insurance_premium = if ltv > insurance.required_below_ltv {
        tiered_premium(loan, ltv, &insurance.premium_rates, "LTV")?
    } else {
        Decimal::ZERO
    };
    let total_mortgage = if insurance.premium_added_to_loan {
        loan + insurance_premium
    } else {
        loan
    };

    let frequency = rules.payment_frequency_rules.rule_for(input.payment_frequency);
    let payments_per_year = frequency.payments_per_year;
    let periodic_rate =
        canadian_periodic_rate(input.interest_rate, rules.interest.compounding, payments_per_year)?;
    let amortized = if frequency.acceleration {
        let payment = accelerated_payment(
            total_mortgage,
            input.interest_rate,
            rules.interest.compounding,
            input.amortization_years,
            payments_per_year,
        )?;
        amortize_with_payment(
            total_mortgage,
            periodic_rate,
            payment,
            input.amortization_years,
            payments_per_year,
        )
    } else {
        amortize(total_mortgage, periodic_rate, input.amortization_years, payments_per_year)?
    };

    let minimum_down_payment = rules.loan_constraints.as_ref().map(|constraints| {
        let minimum = minimum_down_payment(input.property_price, &constraints.min_down_payment);
        if input.down_payment < minimum {
            warnings.push(format!(
                "Down payment of {} is below the required minimum of {}",
                input.down_payment, minimum
            ));
        }
        let max_years = if insurance_premium > Decimal::ZERO {
            constraints.insured_max_amortization_years
        } else {
            constraints.max_amortization_years
        };
        warn_if_term_exceeds(input.amortization_years, Some(max_years), &mut warnings);
        minimum
    });

    let (qualifying_rate, qualifying_payment) = match rules.stress_test.as_ref().filter(|s| s.apply) {
        Some(stress) => {
            let rate = (input.interest_rate + stress.minimum_rate_buffer)
                .max(stress.minimum_qualifying_rate);
            let periodic = canadian_periodic_rate(rate, rules.interest.compounding, payments_per_year)?;
            let payment = amortization::level_payment(
                total_mortgage,
                periodic,
                input.amortization_years.saturating_mul(payments_per_year),
            )?;
            (Some(rate), Some(payment))
        }
        None => (None, None),
    };

    let output = CanadaMortgageOutput {
        loan_amount: loan,
        loan_to_value: ltv,
        insurance_premium,
        total_mortgage,
        payment_amount: amortized.payment,
        payments_per_year,
        total_interest_paid: amortized.total_interest,
        total_paid: amortized.total_paid,
        minimum_down_payment,
        qualifying_rate,
        qualifying_payment,
        amortization_schedule: amortized.schedule,
        other_fees: OtherFees {
            notary_fees: FeeLine::new(Decimal::ZERO, FeeLabel::NotaryFees),
            bank_fees: FeeLine::new(Decimal::ZERO, FeeLabel::BankFees),
            monthly_insurance_fees: FeeLine::new(insurance_premium, FeeLabel::InsurancePremium),
        },
    };

    Ok(with_metadata(
        "Canada mortgage: CMHC-insured principal, semi-annual compounding, level payments",
        input,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn canadian_periodic_rate(
    annual_rate_pct: Rate,
    compounding: Compounding,
    payments_per_year: u32,
) -> FinCalcResult<Rate> {
    if compounding != Compounding::SemiAnnual {
        return Err(FinCalcError::UnsupportedCompounding(compounding.to_string()));
    }
    amortization::semi_annual_periodic_rate(annual_rate_pct / dec!(100), payments_per_year)
}

/// Monthly level payment for the term, split so that bi-weekly pays half of
/// it and weekly a quarter. The extra thirteenth month each year shortens
/// the loan.
fn accelerated_payment(
    principal: Money,
    annual_rate_pct: Rate,
    compounding: Compounding,
    years: u32,
    payments_per_year: u32,
) -> FinCalcResult<Money> {
    if payments_per_year == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "payments_per_year".into(),
            reason: "Payments per year must be > 0".into(),
        });
    }
    let monthly_rate = canadian_periodic_rate(annual_rate_pct, compounding, MONTHS_PER_YEAR)?;
    let monthly = amortization::level_payment(
        principal,
        monthly_rate,
        years.saturating_mul(MONTHS_PER_YEAR),
    )?;
    Ok(monthly * dec!(13) / Decimal::from(payments_per_year))
}

/// Tiered minimum: one share of the first 500 000, another of the excess.
fn minimum_down_payment(price: Money, rule: &MinDownPayment) -> Money {
    let first = price.min(TIERED_DOWN_PAYMENT_LIMIT) * rule.up_to_500k;
    let excess = (price - TIERED_DOWN_PAYMENT_LIMIT).max(Decimal::ZERO) * rule.above_500k;
    first + excess
}
