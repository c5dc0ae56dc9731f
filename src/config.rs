use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::decimal::{Money, Rate};
use crate::errors::{CreditError, Result};
use crate::interest::{RateBracket, RateTable};
use crate::types::{FeeTreatment, InterestMethod, VehicleCategory, VehicleCondition};

/// credit policy: rate tables, limits, fee rules and calculation conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditPolicy {
    pub interest_rates: CategoryTable<ConditionTable<RateTable>>,
    pub categories: CategoryTable<CategoryRules>,
    pub down_payments: CategoryTable<ConditionTable<DownPaymentRule>>,
    /// insurance premium per coverage year, as a share of the vehicle price
    pub insurance_premium_rates: CategoryTable<ConditionTable<Rate>>,
    #[serde(default)]
    pub conventions: CalculationConventions,
}

/// one value per vehicle category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable<T> {
    pub motor: T,
    pub mobil: T,
}

impl<T> CategoryTable<T> {
    pub fn get(&self, category: VehicleCategory) -> &T {
        match category {
            VehicleCategory::Motor => &self.motor,
            VehicleCategory::Mobil => &self.mobil,
        }
    }
}

/// one value per vehicle condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTable<T> {
    pub baru: T,
    pub bekas: T,
}

impl<T> ConditionTable<T> {
    pub fn get(&self, condition: VehicleCondition) -> &T {
        match condition {
            VehicleCondition::Baru => &self.baru,
            VehicleCondition::Bekas => &self.bekas,
        }
    }
}

/// per-category tenor limits and admin fee rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRules {
    pub max_tenor: u32,
    /// tenors from here up to `max_tenor` are allowed but flagged
    pub long_tenor_advisory_from: u32,
    pub admin_fee: AdminFeeRule,
}

/// admin fee as a share of price, clamped to a floor and ceiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminFeeRule {
    pub rate: Rate,
    pub minimum: Money,
    pub maximum: Money,
}

/// down payment ratios: below minimum is rejected, below recommended is flagged
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentRule {
    pub minimum_ratio: Rate,
    pub recommended_ratio: Rate,
}

/// amortization and fee allocation used by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalculationConventions {
    #[serde(default)]
    pub interest_method: InterestMethod,
    #[serde(default)]
    pub fee_treatment: FeeTreatment,
}

impl CreditPolicy {
    /// standard dealership policy
    pub fn standard() -> Self {
        Self {
            interest_rates: CategoryTable {
                motor: ConditionTable {
                    baru: yearly_brackets(&[dec!(12.0), dec!(13.5), dec!(15.0), dec!(16.5)]),
                    bekas: yearly_brackets(&[dec!(15.0), dec!(16.5), dec!(18.0), dec!(19.5)]),
                },
                mobil: ConditionTable {
                    baru: yearly_brackets(&[dec!(6.5), dec!(7.0), dec!(8.0), dec!(8.5), dec!(9.0)]),
                    bekas: yearly_brackets(&[dec!(9.5), dec!(10.5), dec!(11.5), dec!(12.5), dec!(13.5)]),
                },
            },
            categories: CategoryTable {
                motor: CategoryRules {
                    max_tenor: 48,
                    long_tenor_advisory_from: 36,
                    admin_fee: AdminFeeRule {
                        rate: Rate::from_percentage(1),
                        minimum: Money::from_major(500_000),
                        maximum: Money::from_major(1_500_000),
                    },
                },
                mobil: CategoryRules {
                    max_tenor: 60,
                    long_tenor_advisory_from: 48,
                    admin_fee: AdminFeeRule {
                        rate: Rate::from_percentage_decimal(dec!(0.5)),
                        minimum: Money::from_major(1_500_000),
                        maximum: Money::from_major(5_000_000),
                    },
                },
            },
            down_payments: CategoryTable {
                motor: ConditionTable {
                    baru: dp_rule(10, 15),
                    bekas: dp_rule(15, 20),
                },
                mobil: ConditionTable {
                    baru: dp_rule(15, 25),
                    bekas: dp_rule(20, 30),
                },
            },
            insurance_premium_rates: CategoryTable {
                motor: ConditionTable {
                    baru: Rate::from_percentage(3),
                    bekas: Rate::from_percentage_decimal(dec!(3.5)),
                },
                mobil: ConditionTable {
                    baru: Rate::from_percentage_decimal(dec!(2.5)),
                    bekas: Rate::from_percentage(3),
                },
            },
            conventions: CalculationConventions::default(),
        }
    }

    /// shared standard policy, built once
    pub fn standard_ref() -> &'static CreditPolicy {
        static STANDARD: OnceLock<CreditPolicy> = OnceLock::new();
        STANDARD.get_or_init(CreditPolicy::standard)
    }

    /// load a policy from json and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let policy: CreditPolicy =
            serde_json::from_str(json).map_err(|e| CreditError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        policy.validate()?;
        Ok(policy)
    }

    /// serialize the policy as pretty json
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CreditError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    /// override the calculation conventions
    pub fn with_conventions(mut self, conventions: CalculationConventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// check cross-table consistency
    pub fn validate(&self) -> Result<()> {
        for category in VehicleCategory::ALL {
            let rules = self.categories.get(category);

            if rules.max_tenor == 0 {
                return invalid(format!("{category}: maximum tenor must be positive"));
            }
            if rules.long_tenor_advisory_from > rules.max_tenor {
                return invalid(format!(
                    "{category}: long tenor advisory starts at {} beyond the maximum tenor {}",
                    rules.long_tenor_advisory_from, rules.max_tenor
                ));
            }

            let fee = &rules.admin_fee;
            if fee.rate.is_negative() || fee.minimum.is_negative() {
                return invalid(format!("{category}: admin fee rule must not be negative"));
            }
            if fee.minimum > fee.maximum {
                return invalid(format!(
                    "{category}: admin fee floor {} exceeds ceiling {}",
                    fee.minimum, fee.maximum
                ));
            }

            for condition in VehicleCondition::ALL {
                let table = self.interest_rates.get(category).get(condition);
                RateTable::new(table.brackets().to_vec())?;
                if table.max_tenor() < rules.max_tenor {
                    return invalid(format!(
                        "{category}/{condition}: rate table ends at {} but the maximum tenor is {}",
                        table.max_tenor(),
                        rules.max_tenor
                    ));
                }

                let dp = self.down_payments.get(category).get(condition);
                if dp.minimum_ratio.is_negative()
                    || dp.minimum_ratio > dp.recommended_ratio
                    || dp.recommended_ratio > Rate::ONE
                {
                    return invalid(format!(
                        "{category}/{condition}: down payment ratios must satisfy 0 <= minimum <= recommended <= 1"
                    ));
                }

                if self.insurance_premium_rates.get(category).get(condition).is_negative() {
                    return invalid(format!("{category}/{condition}: insurance premium rate is negative"));
                }
            }
        }

        Ok(())
    }
}

impl Default for CreditPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn invalid(message: String) -> Result<()> {
    Err(CreditError::InvalidConfiguration { message })
}

/// consecutive 12-month brackets starting at month 1, rates in percent
fn yearly_brackets(percentages: &[Decimal]) -> RateTable {
    let brackets = percentages
        .iter()
        .zip(0u32..)
        .map(|(pct, year)| {
            RateBracket::new(year * 12 + 1, (year + 1) * 12, Rate::from_percentage_decimal(*pct))
        })
        .collect();
    RateTable::from_sorted(brackets)
}

fn dp_rule(minimum_pct: u32, recommended_pct: u32) -> DownPaymentRule {
    DownPaymentRule {
        minimum_ratio: Rate::from_percentage(minimum_pct),
        recommended_ratio: Rate::from_percentage(recommended_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_is_valid() {
        let policy = CreditPolicy::standard();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.categories.get(VehicleCategory::Mobil).max_tenor, 60);
        assert_eq!(policy.categories.get(VehicleCategory::Motor).max_tenor, 48);
        assert_eq!(policy.conventions.interest_method, InterestMethod::Flat);
        assert_eq!(policy.conventions.fee_treatment, FeeTreatment::Spread);
    }

    #[test]
    fn test_yearly_brackets() {
        let table = yearly_brackets(&[dec!(6.5), dec!(7.0)]);
        let brackets = table.brackets();
        assert_eq!(brackets.len(), 2);
        assert_eq!((brackets[0].min_tenor, brackets[0].max_tenor), (1, 12));
        assert_eq!((brackets[1].min_tenor, brackets[1].max_tenor), (13, 24));
        assert_eq!(brackets[1].annual_rate, Rate::from_percentage(7));
    }

    #[test]
    fn test_json_round_trip() {
        let policy = CreditPolicy::standard();
        let json = policy.to_json_string().unwrap();
        let loaded = CreditPolicy::from_json_str(&json).unwrap();
        assert_eq!(loaded, policy);
    }

    #[test]
    fn test_conventions_default_when_missing() {
        let mut value = serde_json::to_value(CreditPolicy::standard()).unwrap();
        value.as_object_mut().unwrap().remove("conventions");

        let loaded = CreditPolicy::from_json_str(&value.to_string()).unwrap();
        assert_eq!(loaded.conventions, CalculationConventions::default());
    }

    #[test]
    fn test_rejects_rate_table_shorter_than_max_tenor() {
        let mut policy = CreditPolicy::standard();
        policy.categories.mobil.max_tenor = 72;

        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("mobil/baru"));
    }

    #[test]
    fn test_rejects_inconsistent_rules() {
        let mut policy = CreditPolicy::standard();
        policy.down_payments.motor.bekas.minimum_ratio = Rate::from_percentage(40);
        assert!(policy.validate().is_err());

        let mut policy = CreditPolicy::standard();
        policy.categories.motor.admin_fee.minimum = Money::from_major(2_000_000);
        assert!(policy.validate().is_err());

        let mut policy = CreditPolicy::standard();
        policy.categories.motor.long_tenor_advisory_from = 49;
        assert!(policy.validate().is_err());

        let mut policy = CreditPolicy::standard();
        policy.categories.motor.max_tenor = 0;
        policy.categories.motor.long_tenor_advisory_from = 0;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_a_configuration_error() {
        let err = CreditPolicy::from_json_str("{\"interest_rates\": 1}").unwrap_err();
        assert!(matches!(err, CreditError::InvalidConfiguration { .. }));
    }
}
