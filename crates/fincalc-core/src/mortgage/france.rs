use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::error::FinCalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{amortize, validate_rate, validate_term, FeeLabel, FeeLine, OtherFees};

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranceMortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    pub net_monthly_income: Money,
    /// Requested duration; 0 takes the longest duration allowed.
    #[serde(default)]
    pub loan_duration_years: u32,
    /// Annual rate in percent.
    pub annual_interest_rate: Rate,
    pub is_primary_residence: bool,
    pub is_first_time_buyer: bool,
    pub is_new_build: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstTimeBuyerRules {
    pub enabled: bool,
    pub max_debt_ratio: Rate,
    pub max_loan_duration_years: u32,
    #[serde(default)]
    pub quota_disclaimer: Option<String>,
    pub requires_primary_residence: bool,
}

/// Borrower insurance, priced yearly on the loan amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowerInsuranceRules {
    pub average_rate: Rate,
    pub included_in_debt_ratio: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeesRules {
    pub notary_rate_old_property: Rate,
    pub notary_rate_new_property: Rate,
    pub bank_fees_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestRules {
    /// Percentage points added to the borrower's rate.
    pub interest_rate_buffer: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FranceMortgageRules {
    pub max_debt_ratio: Rate,
    pub max_loan_duration_years: u32,
    pub max_loan_duration_new_build_years: u32,
    pub min_down_payment_rate: Rate,
    #[serde(default)]
    pub first_time_buyer: Option<FirstTimeBuyerRules>,
    pub insurance: BorrowerInsuranceRules,
    pub fees: FeesRules,
    pub stress_test: StressTestRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FranceMortgageOutput {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest_paid: Money,
    pub required_loan_amount: Money,
    pub max_monthly_payment: Money,
    pub max_loan_amount: Money,
    pub total_project_cost: Money,
    pub loan_duration_years: u32,
    pub debt_ratio: Rate,
    pub monthly_insurance_cost: Money,
    pub is_eligible: bool,
    pub amortization_schedule: Vec<AmortizationScheduleItem>,
    pub other_fees: OtherFees,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// French home loan with borrowing-capacity check.
///
/// The loan finances the whole project (price, notary and bank fees) less the
/// deposit. Borrowing capacity is the principal that the debt-ratio-capped
/// monthly budget repays at the stress-tested rate; the loan is eligible when
/// that capacity covers the required amount.
///
/// A buyer who fails the deposit or primary-residence conditions gets an
/// all-zero ineligible result rather than an error.
pub fn calculate_mortgage(
    input: &FranceMortgageInput,
    rules: &FranceMortgageRules,
) -> FinCalcResult<ComputationOutput<FranceMortgageOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_rate(input.annual_interest_rate)?;
    if input.property_price <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "property_price".into(),
            reason: "Property price must be positive".into(),
        });
    }

    let methodology = "France home loan: project financing, debt-ratio capacity at stressed rate";
    let first_time_buyer = rules.first_time_buyer.as_ref().filter(|_| input.is_first_time_buyer);

    if let Some(ftb) = first_time_buyer {
        if ftb.requires_primary_residence && !input.is_primary_residence {
            warnings.push("First-time buyer scheme requires a primary residence".to_string());
            return Ok(with_metadata(methodology, input, warnings, ineligible(input)));
        }
    }

    let minimum_deposit = input.property_price * rules.min_down_payment_rate;
    if input.down_payment < minimum_deposit {
        warnings.push(format!(
            "Deposit of {} is below the required minimum of {}",
            input.down_payment, minimum_deposit
        ));
        return Ok(with_metadata(methodology, input, warnings, ineligible(input)));
    }

    let scheme = first_time_buyer.filter(|ftb| ftb.enabled);
    let debt_ratio = scheme.map_or(rules.max_debt_ratio, |ftb| ftb.max_debt_ratio);
    let max_duration = match scheme {
        Some(ftb) => ftb.max_loan_duration_years,
        None if input.is_new_build => rules.max_loan_duration_new_build_years,
        None => rules.max_loan_duration_years,
    };
    if let Some(disclaimer) = scheme.and_then(|ftb| ftb.quota_disclaimer.as_ref()) {
        warnings.push(disclaimer.clone());
    }
    let loan_duration_years = loan_duration(input.loan_duration_years, max_duration, &mut warnings)?;

    let notary_rate = if input.is_new_build {
        rules.fees.notary_rate_new_property
    } else {
        rules.fees.notary_rate_old_property
    };
    let notary_fees = input.property_price * notary_rate;
    let bank_fees = input.property_price * rules.fees.bank_fees_rate;
    let total_project_cost = input.property_price + notary_fees + bank_fees;

    let required_loan_amount = total_project_cost - input.down_payment;
    if required_loan_amount <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Invalid loan amount: deposit covers the whole project cost".into(),
        });
    }

    let monthly_insurance_cost =
        required_loan_amount * rules.insurance.average_rate / Decimal::from(MONTHS_PER_YEAR);
    let mut max_monthly_payment = input.net_monthly_income * debt_ratio;
    if rules.insurance.included_in_debt_ratio {
        max_monthly_payment -= monthly_insurance_cost;
    }

    let periods = loan_duration_years.saturating_mul(MONTHS_PER_YEAR);
    let stressed_rate = amortization::nominal_periodic_rate(
        input.annual_interest_rate + rules.stress_test.interest_rate_buffer,
        MONTHS_PER_YEAR,
    );
    let max_loan_amount = amortization::principal_for_payment(max_monthly_payment, stressed_rate, periods)?;

    let periodic_rate =
        amortization::nominal_periodic_rate(input.annual_interest_rate, MONTHS_PER_YEAR);
    let amortized = amortize(required_loan_amount, periodic_rate, loan_duration_years, MONTHS_PER_YEAR)?;

    let is_eligible = max_loan_amount >= required_loan_amount;
    if !is_eligible {
        warnings.push(format!(
            "Borrowing capacity of {} does not cover the required loan of {}",
            max_loan_amount.round_dp(2),
            required_loan_amount.round_dp(2)
        ));
    }

    let output = FranceMortgageOutput {
        loan_amount: required_loan_amount,
        monthly_payment: amortized.payment,
        total_paid: amortized.total_paid,
        total_interest_paid: amortized.total_interest,
        required_loan_amount,
        max_monthly_payment,
        max_loan_amount,
        total_project_cost,
        loan_duration_years,
        debt_ratio,
        monthly_insurance_cost,
        is_eligible,
        amortization_schedule: amortized.schedule,
        other_fees: fees(notary_fees, bank_fees, monthly_insurance_cost),
    };

    Ok(with_metadata(methodology, input, warnings, output))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn loan_duration(requested: u32, max_duration: u32, warnings: &mut Vec<String>) -> FinCalcResult<u32> {
    validate_term("max_loan_duration_years", max_duration)?;
    if requested == 0 {
        return Ok(max_duration);
    }
    if requested > max_duration {
        warnings.push(format!(
            "Requested duration of {requested} years capped at {max_duration} years"
        ));
        return Ok(max_duration);
    }
    Ok(requested)
}

fn fees(notary: Money, bank: Money, insurance: Money) -> OtherFees {
    OtherFees {
        notary_fees: FeeLine::new(notary, FeeLabel::NotaryFees),
        bank_fees: FeeLine::new(bank, FeeLabel::BankFees),
        monthly_insurance_fees: FeeLine::new(insurance, FeeLabel::MonthlyInsuranceFees),
    }
}

fn ineligible(input: &FranceMortgageInput) -> FranceMortgageOutput {
    FranceMortgageOutput {
        loan_amount: Decimal::ZERO,
        monthly_payment: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        total_interest_paid: Decimal::ZERO,
        required_loan_amount: input.property_price - input.down_payment,
        max_monthly_payment: Decimal::ZERO,
        max_loan_amount: Decimal::ZERO,
        total_project_cost: input.property_price,
        loan_duration_years: 0,
        debt_ratio: Decimal::ZERO,
        monthly_insurance_cost: Decimal::ZERO,
        is_eligible: false,
        amortization_schedule: Vec::new(),
        other_fees: fees(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
    }
}
