use rust_decimal::Decimal;

use crate::config::CreditPolicy;
use crate::decimal::Money;
use crate::errors::{CreditError, Result};
use crate::types::{VehicleCategory, VehicleCondition};

const MONTHS_PER_COVERAGE_YEAR: u32 = 12;

impl CreditPolicy {
    /// admin fee: share of price clamped to the category floor and ceiling,
    /// rounded up to a whole currency unit
    pub fn default_admin_fee(&self, vehicle_price: Money, category: VehicleCategory) -> Result<Money> {
        let rule = &self.categories.get(category).admin_fee;
        let share = vehicle_price
            .max(Money::ZERO)
            .checked_apply_rate(rule.rate)
            .ok_or_else(|| CreditError::overflow("admin fee"))?;

        Ok(Money::from_decimal_ceil(share)
            .clamp(rule.minimum, rule.maximum)
            .max(Money::ZERO))
    }

    /// insurance premium for the whole tenor, bought in whole coverage years
    pub fn default_insurance_fee(
        &self,
        vehicle_price: Money,
        category: VehicleCategory,
        condition: VehicleCondition,
        tenor: u32,
    ) -> Result<Money> {
        let annual_rate = *self.insurance_premium_rates.get(category).get(condition);
        let years = Decimal::from(coverage_years(tenor));
        let premium = vehicle_price
            .max(Money::ZERO)
            .checked_apply_rate(annual_rate)
            .and_then(|annual| annual.checked_mul(years))
            .ok_or_else(|| CreditError::overflow("insurance premium"))?;

        Ok(Money::from_decimal_ceil(premium))
    }
}

/// number of whole coverage years needed for a tenor
pub fn coverage_years(tenor: u32) -> u32 {
    tenor.div_ceil(MONTHS_PER_COVERAGE_YEAR)
}

/// default admin fee under the standard policy
pub fn calculate_default_admin_fee(vehicle_price: Money, category: VehicleCategory) -> Result<Money> {
    CreditPolicy::standard_ref().default_admin_fee(vehicle_price, category)
}

/// default insurance premium under the standard policy
pub fn calculate_default_insurance_fee(
    vehicle_price: Money,
    category: VehicleCategory,
    condition: VehicleCondition,
    tenor: u32,
) -> Result<Money> {
    CreditPolicy::standard_ref().default_insurance_fee(vehicle_price, category, condition, tenor)
}
