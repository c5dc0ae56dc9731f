use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};
use crate::interest::{annuity_payment, period_interest};

/// one installment in the schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInstallment {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub beginning_balance: Money,
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub fee_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// full installment schedule with totals
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentSchedule {
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_fees: Money,
    pub total_payment: Money,
}

/// an amount split over periods: every period pays `regular` except the
/// last, which pays what is left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvenSplit {
    pub regular: Money,
    pub last: Money,
    pub periods: u32,
}

impl EvenSplit {
    /// regular amount is `ceil(total / periods)`, the last one absorbs the rounding
    pub fn new(total: Money, periods: u32) -> Result<Self> {
        if periods == 0 {
            return Err(CreditError::ZeroTenor);
        }

        let regular = Money::from_decimal_ceil(total.as_decimal() / Decimal::from(periods));
        let last = regular
            .checked_mul(Decimal::from(periods - 1))
            .and_then(|spread| total.checked_sub(spread))
            .ok_or_else(|| CreditError::overflow("installment split"))?;

        if last.is_negative() {
            return Err(CreditError::CalculationError {
                message: format!(
                    "{total} is too small to split into {periods} whole installments"
                ),
            });
        }

        Ok(Self {
            regular,
            last,
            periods,
        })
    }

    pub fn amount_for(&self, period: u32) -> Money {
        if period == self.periods {
            self.last
        } else {
            self.regular
        }
    }
}

impl InstallmentSchedule {
    /// flat interest schedule: equal installments of financed amount, interest and
    /// spread fees, with interest allocated evenly by cumulative rounding
    pub fn flat(
        financed: Money,
        total_interest: Money,
        spread_fees: Money,
        tenor: u32,
        first_due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let base = financed
            .checked_add(total_interest)
            .and_then(|amount| amount.checked_add(spread_fees))
            .ok_or_else(|| CreditError::overflow("installment base"))?;
        let installments = EvenSplit::new(base, tenor)?;
        let fees = EvenSplit::new(spread_fees, tenor)?;

        let mut rows = Vec::with_capacity(tenor as usize);
        let mut balance = financed;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for period in 1..=tenor {
            let installment = installments.amount_for(period);
            let fee_portion = fees.amount_for(period);
            let interest_target = total_interest
                .as_decimal()
                .checked_mul(Decimal::from(period))
                .map(|accrued| Money::from_decimal_half_up(accrued / Decimal::from(tenor)))
                .ok_or_else(|| CreditError::overflow("interest allocation"))?;
            let interest_portion = interest_target - cumulative_interest;
            let principal_portion = installment - interest_portion - fee_portion;

            if principal_portion.is_negative() {
                return Err(CreditError::CalculationError {
                    message: format!(
                        "installment {period} of {installment} does not cover its interest and fees"
                    ),
                });
            }

            cumulative_interest += interest_portion;
            cumulative_principal += principal_portion;
            let ending_balance = balance - principal_portion;

            rows.push(ScheduledInstallment {
                period,
                due_date: due_date(first_due_date, period)?,
                beginning_balance: balance,
                installment,
                principal_portion,
                interest_portion,
                fee_portion,
                ending_balance,
                cumulative_interest,
                cumulative_principal,
            });

            balance = ending_balance;
        }

        Self::from_rows(rows)
    }

    /// reducing balance schedule: level payment, interest on the outstanding
    /// balance each month, the last payment clears the balance
    pub fn annuity(
        financed: Money,
        annual_rate: Rate,
        spread_fees: Money,
        tenor: u32,
        first_due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let fees = EvenSplit::new(spread_fees, tenor)?;
        let payment = annuity_payment(financed, annual_rate, tenor)?;

        let mut rows = Vec::with_capacity(tenor as usize);
        let mut balance = financed;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for period in 1..=tenor {
            let interest_portion = period_interest(balance, annual_rate)?;
            let principal_portion = if period == tenor {
                balance
            } else {
                (payment - interest_portion).min(balance)
            };

            if principal_portion.is_negative() {
                return Err(CreditError::CalculationError {
                    message: format!(
                        "payment {payment} does not cover interest {interest_portion} in period {period}"
                    ),
                });
            }

            let fee_portion = fees.amount_for(period);
            let installment = principal_portion
                .checked_add(interest_portion)
                .and_then(|amount| amount.checked_add(fee_portion))
                .ok_or_else(|| CreditError::overflow("installment"))?;
            cumulative_interest = cumulative_interest
                .checked_add(interest_portion)
                .ok_or_else(|| CreditError::overflow("cumulative interest"))?;
            cumulative_principal += principal_portion;
            let ending_balance = balance - principal_portion;

            rows.push(ScheduledInstallment {
                period,
                due_date: due_date(first_due_date, period)?,
                beginning_balance: balance,
                installment,
                principal_portion,
                interest_portion,
                fee_portion,
                ending_balance,
                cumulative_interest,
                cumulative_principal,
            });

            balance = ending_balance;
        }

        Self::from_rows(rows)
    }

    fn from_rows(installments: Vec<ScheduledInstallment>) -> Result<Self> {
        let total = |portion: fn(&ScheduledInstallment) -> Money, what: &str| {
            Money::checked_sum(installments.iter().map(portion))
                .ok_or_else(|| CreditError::overflow(what))
        };
        let total_interest = total(|p| p.interest_portion, "total interest")?;
        let total_fees = total(|p| p.fee_portion, "total fees")?;
        let total_payment = total(|p| p.installment, "total payment")?;

        Ok(Self {
            installments,
            total_interest,
            total_fees,
            total_payment,
        })
    }

    /// get installment for a specific period (1-based)
    pub fn get(&self, period: u32) -> Option<&ScheduledInstallment> {
        period
            .checked_sub(1)
            .and_then(|index| self.installments.get(index as usize))
    }

    /// the installment charged every month but the last
    pub fn regular_installment(&self) -> Money {
        self.installments
            .first()
            .map(|p| p.installment)
            .unwrap_or(Money::ZERO)
    }

    pub fn last_installment(&self) -> Money {
        self.installments
            .last()
            .map(|p| p.installment)
            .unwrap_or(Money::ZERO)
    }

    pub fn amounts(&self) -> Vec<Money> {
        self.installments.iter().map(|p| p.installment).collect()
    }
}

fn due_date(first: Option<NaiveDate>, period: u32) -> Result<Option<NaiveDate>> {
    let Some(first) = first else {
        return Ok(None);
    };

    first
        .checked_add_months(Months::new(period - 1))
        .map(Some)
        .ok_or_else(|| CreditError::CalculationError {
            message: format!("due date for period {period} is out of range"),
        })
}
