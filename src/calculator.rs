use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};
use crate::interest::{effective_annual_rate, flat_interest};
use crate::payments::{InstallmentSchedule, ScheduledInstallment};
use crate::types::{FeeTreatment, InterestMethod};

/// everything needed to price a vehicle credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCalculationInput {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub tenor: u32,
    /// annual flat rate as a fraction
    pub interest_rate: Rate,
    pub admin_fee: Money,
    pub insurance_fee: Money,
    #[serde(default)]
    pub interest_method: InterestMethod,
    #[serde(default)]
    pub fee_treatment: FeeTreatment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

impl CreditCalculationInput {
    pub fn new(
        vehicle_price: Money,
        down_payment: Money,
        tenor: u32,
        interest_rate: Rate,
        admin_fee: Money,
        insurance_fee: Money,
    ) -> Self {
        Self {
            vehicle_price,
            down_payment,
            tenor,
            interest_rate,
            admin_fee,
            insurance_fee,
            interest_method: InterestMethod::default(),
            fee_treatment: FeeTreatment::default(),
            first_due_date: None,
        }
    }

    pub fn with_interest_method(mut self, interest_method: InterestMethod) -> Self {
        self.interest_method = interest_method;
        self
    }

    pub fn with_fee_treatment(mut self, fee_treatment: FeeTreatment) -> Self {
        self.fee_treatment = fee_treatment;
        self
    }

    pub fn with_first_due_date(mut self, first_due_date: NaiveDate) -> Self {
        self.first_due_date = Some(first_due_date);
        self
    }

    /// amount borrowed before any capitalized fees
    pub fn principal(&self) -> Result<Money> {
        self.vehicle_price
            .checked_sub(self.down_payment)
            .ok_or_else(|| CreditError::overflow("principal"))
    }

    pub fn total_fees(&self) -> Result<Money> {
        self.admin_fee
            .checked_add(self.insurance_fee)
            .ok_or_else(|| CreditError::overflow("total fees"))
    }
}

/// priced credit with its installment schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCalculationResult {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub tenor: u32,
    pub interest_rate: Rate,
    pub interest_method: InterestMethod,
    pub fee_treatment: FeeTreatment,
    pub admin_fee: Money,
    pub insurance_fee: Money,
    pub principal: Money,
    /// principal plus any capitalized fees
    pub financed_amount: Money,
    pub total_interest: Money,
    pub monthly_installment: Money,
    pub last_installment: Money,
    pub total_installments: Money,
    /// due at signing: down payment plus upfront fees
    pub upfront_payment: Money,
    /// principal, interest and fees, excluding the down payment
    pub total_payable: Money,
    pub effective_rate: Rate,
    pub schedule: Vec<ScheduledInstallment>,
}

/// price a credit: interest, fees and the installment schedule
pub fn calculate_credit(input: &CreditCalculationInput) -> Result<CreditCalculationResult> {
    if input.tenor == 0 {
        return Err(CreditError::ZeroTenor);
    }
    if input.interest_rate.is_negative() {
        return Err(CreditError::InvalidInterestRate {
            rate: input.interest_rate,
        });
    }
    if input.admin_fee.is_negative() {
        return Err(CreditError::NegativeFee {
            fee: "admin fee",
            amount: input.admin_fee,
        });
    }
    if input.insurance_fee.is_negative() {
        return Err(CreditError::NegativeFee {
            fee: "insurance fee",
            amount: input.insurance_fee,
        });
    }

    let principal = input.principal()?;
    if !principal.is_positive() {
        return Err(CreditError::NonPositivePrincipal { principal });
    }

    let fees = input.total_fees()?;
    let (financed_amount, spread_fees, upfront_fees) = match input.fee_treatment {
        FeeTreatment::Spread => (principal, fees, Money::ZERO),
        FeeTreatment::Upfront => (principal, Money::ZERO, fees),
        FeeTreatment::Capitalized => (
            principal
                .checked_add(fees)
                .ok_or_else(|| CreditError::overflow("financed amount"))?,
            Money::ZERO,
            Money::ZERO,
        ),
    };

    let schedule = match input.interest_method {
        InterestMethod::Flat => {
            let interest = flat_interest(financed_amount, input.interest_rate, input.tenor)?;
            InstallmentSchedule::flat(
                financed_amount,
                interest,
                spread_fees,
                input.tenor,
                input.first_due_date,
            )?
        }
        InterestMethod::Annuity => InstallmentSchedule::annuity(
            financed_amount,
            input.interest_rate,
            spread_fees,
            input.tenor,
            input.first_due_date,
        )?,
    };

    let monthly_installment = schedule.regular_installment();
    let last_installment = schedule.last_installment();
    if !last_installment.is_positive() {
        return Err(CreditError::CalculationError {
            message: format!("last installment of {last_installment} is not positive"),
        });
    }

    let total_installments = schedule.total_payment;
    let effective_rate = effective_annual_rate(principal, &schedule.amounts())?;
    let upfront_payment = input
        .down_payment
        .checked_add(upfront_fees)
        .ok_or_else(|| CreditError::overflow("upfront payment"))?;
    let total_payable = total_installments
        .checked_add(upfront_fees)
        .ok_or_else(|| CreditError::overflow("total payable"))?;

    tracing::debug!(
        tenor = input.tenor,
        method = ?input.interest_method,
        fees = ?input.fee_treatment,
        %principal,
        total_interest = %schedule.total_interest,
        %monthly_installment,
        %last_installment,
        %effective_rate,
        "calculated credit"
    );

    Ok(CreditCalculationResult {
        vehicle_price: input.vehicle_price,
        down_payment: input.down_payment,
        tenor: input.tenor,
        interest_rate: input.interest_rate,
        interest_method: input.interest_method,
        fee_treatment: input.fee_treatment,
        admin_fee: input.admin_fee,
        insurance_fee: input.insurance_fee,
        principal,
        financed_amount,
        total_interest: schedule.total_interest,
        monthly_installment,
        last_installment,
        total_installments,
        upfront_payment,
        total_payable,
        effective_rate,
        schedule: schedule.installments,
    })
}
