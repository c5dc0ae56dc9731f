use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

/// number of decimal places kept for currency amounts
pub const MONEY_SCALE: u32 = 2;

/// Money type backed by a fixed decimal, never binary floating point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(MONEY_SCALE))
    }

    /// round a raw amount up to the next whole currency unit
    pub fn from_decimal_ceil(d: Decimal) -> Self {
        Money(d.ceil())
    }

    /// round a raw amount to the nearest whole currency unit, halves away from zero
    pub fn from_decimal_half_up(d: Decimal) -> Self {
        Money(d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(MONEY_SCALE)))
    }

    /// create from whole currency units (rupiah, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor units with the given scale
    pub fn from_minor(amount: i64, scale: u32) -> Self {
        Money(Decimal::new(amount, scale).round_dp(MONEY_SCALE))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// round up to the next whole currency unit
    pub fn ceil_unit(&self) -> Self {
        Money(self.0.ceil())
    }

    /// round to the nearest whole currency unit, halves away from zero
    pub fn round_half_up_unit(&self) -> Self {
        Money(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// check if strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// clamp between a floor and a ceiling
    pub fn clamp(self, floor: Self, ceiling: Self) -> Self {
        self.max(floor).min(ceiling)
    }

    /// apply a rate without rounding to the money scale
    pub fn apply_rate(&self, rate: Rate) -> Decimal {
        self.0 * rate.as_decimal()
    }

    /// addition that reports overflow instead of panicking
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// multiply and round to the money scale, `None` on overflow
    pub fn checked_mul(self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(|d| Money(d.round_dp(MONEY_SCALE)))
    }

    /// `apply_rate` that reports overflow
    pub fn checked_apply_rate(&self, rate: Rate) -> Option<Decimal> {
        self.0.checked_mul(rate.as_decimal())
    }

    /// sum that stops at the first overflow
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// share of `whole` this amount represents, `None` when whole is not positive
    pub fn ratio_of(&self, whole: Money) -> Option<Rate> {
        if !whole.is_positive() {
            return None;
        }
        Some(Rate::from_decimal(self.0 / whole.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(MONEY_SCALE))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money((self.0 / other).round_dp(MONEY_SCALE))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + *x)
    }
}

/// rate type for interest rates, percentages, and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    /// create from fractional percentage (e.g., 8.5 for 8.5%)
    pub fn from_percentage_decimal(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10_000))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Rate(self.0.round_dp(dp))
    }

    /// cut to specified decimal places, never rounding up
    pub fn truncate_dp(&self, dp: u32) -> Self {
        Rate(self.0.round_dp_with_strategy(dp, RoundingStrategy::ToZero))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.125").unwrap();
        assert_eq!(m.to_string(), "100.12"); // banker's rounding to 2 places

        let m = Money::from_minor(12_345, 2);
        assert_eq!(m, Money::from_decimal(dec!(123.45)));
    }

    #[test]
    fn test_unit_rounding() {
        let m = Money::from_decimal(dec!(4133333.33));
        assert_eq!(m.ceil_unit(), Money::from_major(4_133_334));
        assert_eq!(m.round_half_up_unit(), Money::from_major(4_133_333));

        let half = Money::from_decimal(dec!(10.50));
        assert_eq!(half.round_half_up_unit(), Money::from_major(11));
        assert_eq!(half.ceil_unit(), Money::from_major(11));

        // raw decimals are rounded once, without a 2dp step in between
        assert_eq!(Money::from_decimal_half_up(dec!(10.4951)), Money::from_major(10));
        assert_eq!(Money::from_decimal_ceil(dec!(8884.001)), Money::from_major(8_885));

        // whole amounts are left alone
        let whole = Money::from_major(500_000);
        assert_eq!(whole.ceil_unit(), whole);
        assert_eq!(whole.round_half_up_unit(), whole);
    }

    #[test]
    fn test_ratio_of() {
        let dp = Money::from_major(30_000_000);
        let price = Money::from_major(150_000_000);
        assert_eq!(dp.ratio_of(price), Some(Rate::from_percentage(20)));
        assert_eq!(dp.ratio_of(Money::ZERO), None);
        assert_eq!(dp.ratio_of(Money::from_major(-1)), None);
    }

    #[test]
    fn test_clamp_and_sum() {
        let floor = Money::from_major(500_000);
        let ceiling = Money::from_major(1_500_000);
        assert_eq!(Money::from_major(10).clamp(floor, ceiling), floor);
        assert_eq!(Money::from_major(9_000_000).clamp(floor, ceiling), ceiling);
        assert_eq!(Money::from_major(700_000).clamp(floor, ceiling), Money::from_major(700_000));

        let total: Money = [Money::from_major(1), Money::from_major(2), Money::from_major(3)]
            .iter()
            .sum();
        assert_eq!(total, Money::from_major(6));
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_decimal(Decimal::MAX);
        assert_eq!(max.checked_add(Money::ONE), None);
        assert_eq!(max.checked_mul(dec!(2)), None);
        assert_eq!(max.checked_apply_rate(Rate::from_percentage(200)), None);
        assert_eq!(Money::from_decimal(Decimal::MIN).checked_sub(Money::ONE), None);
        assert_eq!(Money::checked_sum([max, Money::ONE]), None);

        let total = Money::checked_sum([Money::from_major(2), Money::from_major(3)]);
        assert_eq!(total, Some(Money::from_major(5)));
        assert_eq!(Money::from_major(10).checked_mul(dec!(0.333)), Some(Money::from_decimal(dec!(3.33))));
    }

    #[test]
    fn test_rate_truncation() {
        let ratio = Rate::from_decimal(dec!(0.14999999));
        assert_eq!(ratio.truncate_dp(4).as_decimal(), dec!(0.1499));
        assert_eq!(ratio.round_dp(4).as_decimal(), dec!(0.1500));
    }

    #[test]
    fn test_rate_conversions() {
        assert_eq!(Rate::from_percentage(8).as_decimal(), dec!(0.08));
        assert_eq!(Rate::from_percentage_decimal(dec!(8.5)).as_decimal(), dec!(0.085));
        assert_eq!(Rate::from_bps(650), Rate::from_percentage_decimal(dec!(6.5)));
        assert_eq!(Rate::from_percentage(12).monthly_rate().as_decimal(), dec!(0.01));
        assert_eq!(Rate::from_percentage_decimal(dec!(8.5)).to_string(), "8.5%");
    }
}
