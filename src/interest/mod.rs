pub mod brackets;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};

pub use brackets::{get_default_interest_rate, RateBracket, RateTable};

const MONTHS_PER_YEAR: u32 = 12;
const EFFECTIVE_RATE_ITERATIONS: u32 = 80;
const EFFECTIVE_RATE_DP: u32 = 6;

/// flat interest on the original amount for the whole tenor, rounded once
pub fn flat_interest(amount: Money, annual_rate: Rate, tenor_months: u32) -> Result<Money> {
    let interest = amount
        .as_decimal()
        .checked_mul(annual_rate.as_decimal())
        .and_then(|d| d.checked_mul(Decimal::from(tenor_months)))
        .ok_or_else(|| CreditError::overflow("flat interest"))?;

    Ok(Money::from_decimal_half_up(interest / Decimal::from(MONTHS_PER_YEAR)))
}

/// level annuity payment, rounded up to a whole currency unit
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r` the monthly rate
pub fn annuity_payment(principal: Money, annual_rate: Rate, tenor_months: u32) -> Result<Money> {
    if tenor_months == 0 {
        return Ok(principal);
    }

    let r = annual_rate.monthly_rate().as_decimal();
    let overflow = || CreditError::overflow("annuity payment");
    let compound = growth_factor(r, tenor_months).ok_or_else(overflow)?;
    let denominator = compound - Decimal::ONE;

    // rates too small to move the compound factor behave like no interest
    if r.is_zero() || denominator.is_zero() {
        return Ok(Money::from_decimal_ceil(principal.as_decimal() / Decimal::from(tenor_months)));
    }

    let payment = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|d| d.checked_mul(compound))
        .and_then(|d| d.checked_div(denominator))
        .ok_or_else(overflow)?;

    Ok(Money::from_decimal_ceil(payment))
}

/// interest for one period of a reducing balance loan
pub fn period_interest(balance: Money, annual_rate: Rate) -> Result<Money> {
    balance
        .checked_apply_rate(annual_rate.monthly_rate())
        .map(Money::from_decimal_half_up)
        .ok_or_else(|| CreditError::overflow("period interest"))
}

/// annualized reducing-balance rate at which the installments repay `principal`
///
/// bisection on the monthly rate; zero when the installments do not exceed
/// the principal
pub fn effective_annual_rate(principal: Money, installments: &[Money]) -> Result<Rate> {
    let total = Money::checked_sum(installments.iter().copied())
        .ok_or_else(|| CreditError::overflow("installment total"))?;
    if !principal.is_positive() || installments.is_empty() || total <= principal {
        return Ok(Rate::ZERO);
    }

    let target = principal.as_decimal();
    let mut low = Decimal::ZERO;
    let mut high = Decimal::ONE;

    if present_value(installments, high) > target {
        return Ok(Rate::from_decimal(high * Decimal::from(MONTHS_PER_YEAR)));
    }

    for _ in 0..EFFECTIVE_RATE_ITERATIONS {
        let mid = (low + high) / Decimal::TWO;
        if present_value(installments, mid) > target {
            low = mid;
        } else {
            high = mid;
        }
    }

    let monthly = (low + high) / Decimal::TWO;
    Ok(Rate::from_decimal(monthly * Decimal::from(MONTHS_PER_YEAR)).round_dp(EFFECTIVE_RATE_DP))
}

/// present value of monthly installments at a monthly rate
///
/// never exceeds the plain total, which the caller has already checked
fn present_value(installments: &[Money], monthly_rate: Decimal) -> Decimal {
    let discount = Decimal::ONE / (Decimal::ONE + monthly_rate);
    let mut factor = Decimal::ONE;
    let mut pv = Decimal::ZERO;

    for installment in installments {
        factor *= discount;
        pv += installment.as_decimal() * factor;
    }

    pv
}

/// (1 + r)^n by repeated multiplication, `None` on overflow
fn growth_factor(r: Decimal, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(r)?;
    (0..periods).try_fold(Decimal::ONE, |compound, _| compound.checked_mul(base))
}
