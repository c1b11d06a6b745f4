use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, AmortizationScheduleItem};
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

use super::{
    amortize, cumulative_duty, loan_amount, validate_rate, validate_term, warn_if_term_exceeds,
    DutyBand, FeeLabel, FeeLine, OtherFees,
};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SouthAfricaMortgageInput {
    pub property_price: Money,
    pub down_payment: Money,
    /// Annual rate in percent (e.g. 11.75).
    pub annual_interest_rate: Rate,
    pub amortization_years: u32,
    pub gross_monthly_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanConstraints {
    /// Maximum loan-to-value as a fraction.
    #[serde(default)]
    pub max_ltv: Option<Rate>,
    #[serde(default)]
    pub min_down_payment_percent: Option<Rate>,
    #[serde(default)]
    pub max_amortization_years: Option<u32>,
    pub max_debt_to_income_percent: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDutyRules {
    pub brackets: Vec<DutyBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeesRules {
    pub bond_registration_percent: Rate,
    pub transfer_duty: TransferDutyRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SouthAfricaMortgageRules {
    pub loan_constraints: LoanConstraints,
    pub fees: FeesRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SouthAfricaMortgageOutput {
    pub loan_amount: Money,
    pub loan_to_value: Rate,
    pub monthly_payment: Money,
    pub total_interest_paid: Money,
    pub total_paid: Money,
    /// Monthly repayment over gross monthly income, in percent.
    pub debt_to_income_ratio: Rate,
    pub is_affordable: bool,
    pub transfer_duty: Money,
    pub bond_registration_fee: Money,
    pub amortization_schedule: Vec<AmortizationScheduleItem>,
    pub other_fees: OtherFees,
}

/// South African home loan (bond) with transfer duty, bond registration
/// costs and a debt-to-income affordability check.
///
/// Affordability is advisory: an unaffordable bond is still computed and
/// reported with `is_affordable = false`.
pub fn calculate_mortgage(
    input: &SouthAfricaMortgageInput,
    rules: &SouthAfricaMortgageRules,
) -> FinCalcResult<ComputationOutput<SouthAfricaMortgageOutput>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_term("amortization_years", input.amortization_years)?;
    validate_rate(input.annual_interest_rate)?;

    let loan = loan_amount(input.property_price, input.down_payment)?;
    let ltv = loan / input.property_price;
    let constraints = &rules.loan_constraints;

    if let Some(max_ltv) = constraints.max_ltv {
        if ltv > max_ltv {
            warnings.push(format!("LTV of {ltv} exceeds the lending limit of {max_ltv}"));
        }
    }
    if let Some(min_pct) = constraints.min_down_payment_percent {
        let required = input.property_price * min_pct / dec!(100);
        if input.down_payment < required {
            warnings.push(format!(
                "Deposit of {} is below the required {}% ({})",
                input.down_payment, min_pct, required
            ));
        }
    }
    warn_if_term_exceeds(
        input.amortization_years,
        constraints.max_amortization_years,
        &mut warnings,
    );

    let periodic_rate =
        amortization::nominal_periodic_rate(input.annual_interest_rate, MONTHS_PER_YEAR);
    let amortized = amortize(loan, periodic_rate, input.amortization_years, MONTHS_PER_YEAR)?;

    if input.gross_monthly_income <= Decimal::ZERO {
        warnings.push("No gross monthly income supplied; debt-to-income reported as 0".to_string());
    }
    let debt_to_income_ratio = ratio_or_zero(amortized.payment, input.gross_monthly_income) * dec!(100);
    let is_affordable = input.gross_monthly_income > Decimal::ZERO
        && debt_to_income_ratio <= constraints.max_debt_to_income_percent;
    if !is_affordable {
        warnings.push(format!(
            "Repayment is {debt_to_income_ratio}% of gross income, above the {}% limit",
            constraints.max_debt_to_income_percent
        ));
    }

    let bond_registration_fee = loan * rules.fees.bond_registration_percent / dec!(100);
    let transfer_duty = cumulative_duty(input.property_price, &rules.fees.transfer_duty.brackets);

    let output = SouthAfricaMortgageOutput {
        loan_amount: loan,
        loan_to_value: ltv,
        monthly_payment: amortized.payment,
        total_interest_paid: amortized.total_interest,
        total_paid: amortized.total_paid,
        debt_to_income_ratio,
        is_affordable,
        transfer_duty,
        bond_registration_fee,
        amortization_schedule: amortized.schedule,
        other_fees: OtherFees {
            notary_fees: FeeLine::new(bond_registration_fee, FeeLabel::BondRegistrationFees),
            bank_fees: FeeLine::new(transfer_duty, FeeLabel::TransferDuty),
            monthly_insurance_fees: FeeLine::new(Decimal::ZERO, FeeLabel::MonthlyInsuranceFees),
        },
    };

    Ok(with_metadata(
        "South Africa home loan: level monthly payments, transfer duty, DTI affordability",
        input,
        warnings,
        output,
    ))
}
