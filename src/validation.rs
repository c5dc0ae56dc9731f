use serde::Serialize;
use thiserror::Error;

use crate::config::CreditPolicy;
use crate::decimal::{Money, Rate};
use crate::types::{VehicleCategory, VehicleCondition};

/// ratios are reported cut to four decimal places (0.01%), never rounded up
const REPORTED_RATIO_DP: u32 = 4;

/// hard failure: the application must be rejected
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PolicyViolation {
    #[error("vehicle price must be greater than zero")]
    NonPositivePrice {
        vehicle_price: Money,
    },

    #[error("down payment must not be negative")]
    NegativeDownPayment {
        down_payment: Money,
    },

    #[error("down payment must be less than the vehicle price")]
    DownPaymentNotBelowPrice {
        down_payment: Money,
        vehicle_price: Money,
    },

    #[error("tenor must be at least 1 month")]
    NonPositiveTenor {
        tenor: i64,
    },

    #[error("tenor of {tenor} months exceeds the maximum of {maximum} months for {category}")]
    TenorAboveMaximum {
        tenor: i64,
        maximum: u32,
        category: VehicleCategory,
    },

    #[error("down payment of {ratio} is below the minimum of {minimum} for {category} {condition}")]
    DownPaymentBelowMinimum {
        ratio: Rate,
        minimum: Rate,
        category: VehicleCategory,
        condition: VehicleCondition,
    },

    #[error("interest rate must not be negative")]
    NegativeInterestRate {
        interest_rate: Rate,
    },

    #[error("{fee} must not be negative")]
    NegativeFee {
        fee: &'static str,
        amount: Money,
    },
}

/// soft advisory: reported alongside a successful calculation
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PolicyAdvisory {
    #[error("down payment of {ratio} is below the recommended {recommended}")]
    DownPaymentBelowRecommended {
        ratio: Rate,
        recommended: Rate,
    },

    #[error("tenor of {tenor} months is close to the maximum of {maximum} months")]
    TenorNearMaximum {
        tenor: u32,
        maximum: u32,
    },
}

/// outcome of validating a credit application
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<PolicyViolation>,
    pub warnings: Vec<PolicyAdvisory>,
}

impl ValidationResult {
    fn new(errors: Vec<PolicyViolation>, warnings: Vec<PolicyAdvisory>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// record a violation found outside the policy checks
    pub fn reject(&mut self, violation: PolicyViolation) {
        self.errors.push(violation);
        self.is_valid = false;
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

impl CreditPolicy {
    /// check an application against the policy, collecting every error and warning
    pub fn validate_application(
        &self,
        vehicle_price: Money,
        down_payment: Money,
        tenor: i64,
        category: VehicleCategory,
        condition: VehicleCondition,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let rules = self.categories.get(category);
        let dp_rule = self.down_payments.get(category).get(condition);

        if !vehicle_price.is_positive() {
            errors.push(PolicyViolation::NonPositivePrice { vehicle_price });
        }
        if down_payment.is_negative() {
            errors.push(PolicyViolation::NegativeDownPayment { down_payment });
        }
        if down_payment >= vehicle_price {
            errors.push(PolicyViolation::DownPaymentNotBelowPrice {
                down_payment,
                vehicle_price,
            });
        }

        if tenor <= 0 {
            errors.push(PolicyViolation::NonPositiveTenor { tenor });
        } else if tenor > i64::from(rules.max_tenor) {
            errors.push(PolicyViolation::TenorAboveMaximum {
                tenor,
                maximum: rules.max_tenor,
                category,
            });
        } else if tenor >= i64::from(rules.long_tenor_advisory_from) {
            warnings.push(PolicyAdvisory::TenorNearMaximum {
                tenor: tenor as u32,
                maximum: rules.max_tenor,
            });
        }

        // the ratio only means something for a sensible price/down payment pair
        if !down_payment.is_negative() && down_payment < vehicle_price {
            if let Some(ratio) = down_payment.ratio_of(vehicle_price) {
                let reported = ratio.truncate_dp(REPORTED_RATIO_DP);
                if ratio < dp_rule.minimum_ratio {
                    errors.push(PolicyViolation::DownPaymentBelowMinimum {
                        ratio: reported,
                        minimum: dp_rule.minimum_ratio,
                        category,
                        condition,
                    });
                } else if ratio < dp_rule.recommended_ratio {
                    warnings.push(PolicyAdvisory::DownPaymentBelowRecommended {
                        ratio: reported,
                        recommended: dp_rule.recommended_ratio,
                    });
                }
            }
        }

        let result = ValidationResult::new(errors, warnings);
        tracing::debug!(
            %category,
            %condition,
            tenor,
            is_valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated credit application"
        );
        result
    }
}

/// validate an application against the standard policy
pub fn validate_credit_application(
    vehicle_price: Money,
    down_payment: Money,
    tenor: i64,
    category: VehicleCategory,
    condition: VehicleCondition,
) -> ValidationResult {
    CreditPolicy::standard_ref().validate_application(
        vehicle_price,
        down_payment,
        tenor,
        category,
        condition,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VehicleCategory::{Mobil, Motor};
    use crate::types::VehicleCondition::{Baru, Bekas};
    use rust_decimal_macros::dec;

    fn m(amount: i64) -> Money {
        Money::from_major(amount)
    }

    #[test]
    fn test_reference_application_is_valid_with_advisory() {
        let result = validate_credit_application(m(150_000_000), m(30_000_000), 36, Mobil, Baru);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        // 20% clears the 15% floor but not the 25% recommendation
        assert_eq!(
            result.warnings,
            vec![PolicyAdvisory::DownPaymentBelowRecommended {
                ratio: Rate::from_percentage(20),
                recommended: Rate::from_percentage(25),
            }]
        );
    }

    #[test]
    fn test_used_motorcycle_with_low_down_payment_is_rejected() {
        let result = validate_credit_application(m(20_000_000), m(1_000_000), 24, Motor, Bekas);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![PolicyViolation::DownPaymentBelowMinimum {
                ratio: Rate::from_percentage(5),
                minimum: Rate::from_percentage(15),
                category: Motor,
                condition: Bekas,
            }]
        );
        assert_eq!(
            result.error_messages(),
            vec!["down payment of 5% is below the minimum of 15% for motor bekas".to_string()]
        );
    }

    #[test]
    fn test_down_payment_at_or_above_price_always_fails() {
        for category in VehicleCategory::ALL {
            for condition in VehicleCondition::ALL {
                for tenor in [-3, 0, 12, 36, 100] {
                    for (price, dp) in [(100, 100), (100, 250), (0, 0), (-10, -5)] {
                        let result = validate_credit_application(m(price), m(dp), tenor, category, condition);
                        assert!(!result.is_valid);
                        assert!(result
                            .errors
                            .iter()
                            .any(|e| matches!(e, PolicyViolation::DownPaymentNotBelowPrice { .. })));
                    }
                }
            }
        }
    }

    #[test]
    fn test_non_positive_tenor_always_fails() {
        for tenor in [0, -1, -60] {
            let result = validate_credit_application(m(150_000_000), m(50_000_000), tenor, Mobil, Baru);
            assert!(!result.is_valid);
            assert_eq!(result.errors, vec![PolicyViolation::NonPositiveTenor { tenor }]);
        }
    }

    #[test]
    fn test_all_errors_are_collected() {
        let result = validate_credit_application(m(0), m(-1), 0, Mobil, Bekas);

        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                PolicyViolation::NonPositivePrice { vehicle_price: m(0) },
                PolicyViolation::NegativeDownPayment { down_payment: m(-1) },
                PolicyViolation::NonPositiveTenor { tenor: 0 },
            ]
        );

        let result = validate_credit_application(m(20_000_000), m(500_000), 72, Motor, Baru);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            PolicyViolation::TenorAboveMaximum { tenor: 72, maximum: 48, category: Motor }
        ));
        assert!(matches!(result.errors[1], PolicyViolation::DownPaymentBelowMinimum { .. }));
    }

    #[test]
    fn test_tenor_limits_by_category() {
        let price = m(100_000_000);
        let dp = m(40_000_000);

        let at_max = validate_credit_application(price, dp, 60, Mobil, Baru);
        assert!(at_max.is_valid);
        assert_eq!(
            at_max.warnings,
            vec![PolicyAdvisory::TenorNearMaximum { tenor: 60, maximum: 60 }]
        );

        assert!(!validate_credit_application(price, dp, 61, Mobil, Baru).is_valid);
        assert!(validate_credit_application(price, dp, 48, Motor, Baru).is_valid);
        assert!(!validate_credit_application(price, dp, 49, Motor, Baru).is_valid);

        // advisory threshold is inclusive
        let below = validate_credit_application(price, dp, 47, Mobil, Baru);
        assert!(below.warnings.is_empty());
        let from = validate_credit_application(price, dp, 48, Mobil, Baru);
        assert_eq!(from.warnings.len(), 1);
        let motor = validate_credit_application(price, dp, 36, Motor, Baru);
        assert_eq!(motor.warning_messages(), vec!["tenor of 36 months is close to the maximum of 48 months".to_string()]);
    }

    #[test]
    fn test_minimum_ratio_boundary() {
        let price = m(100_000_000);

        // exactly the 15% floor passes
        let at_floor = validate_credit_application(price, m(15_000_000), 24, Mobil, Baru);
        assert!(at_floor.is_valid);

        // one rupiah short fails
        let short = validate_credit_application(price, m(14_999_999), 24, Mobil, Baru);
        assert!(!short.is_valid);
        match &short.errors[0] {
            PolicyViolation::DownPaymentBelowMinimum { ratio, .. } => {
                assert_eq!(ratio.as_decimal(), dec!(0.1499));
            }
            other => panic!("unexpected violation {other:?}"),
        }
        // the reported share never rounds up to the minimum it failed
        assert_eq!(
            short.error_messages(),
            vec!["down payment of 14.99% is below the minimum of 15% for mobil baru".to_string()]
        );

        let just_short = validate_credit_application(price, m(24_999_999), 24, Mobil, Baru);
        assert_eq!(
            just_short.warning_messages(),
            vec!["down payment of 24.99% is below the recommended 25%".to_string()]
        );

        // at the recommendation there is nothing to flag
        let recommended = validate_credit_application(price, m(25_000_000), 24, Mobil, Baru);
        assert!(recommended.is_valid);
        assert!(recommended.warnings.is_empty());
    }

    #[test]
    fn test_used_vehicles_need_more_down_payment() {
        let price = m(100_000_000);
        let dp = m(17_000_000);

        assert!(validate_credit_application(price, dp, 24, Mobil, Baru).is_valid);
        assert!(!validate_credit_application(price, dp, 24, Mobil, Bekas).is_valid);
    }

    #[test]
    fn test_reject_invalidates_result() {
        let mut result = validate_credit_application(m(150_000_000), m(50_000_000), 24, Mobil, Baru);
        assert!(result.is_valid);

        result.reject(PolicyViolation::NegativeFee {
            fee: "admin fee",
            amount: m(-5),
        });
        assert!(!result.is_valid);
        assert_eq!(result.error_messages(), vec!["admin fee must not be negative".to_string()]);
    }

    #[test]
    fn test_serialized_report() {
        let result = validate_credit_application(m(20_000_000), m(1_000_000), 24, Motor, Bekas);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["isValid"], false);
        assert_eq!(json["errors"][0]["code"], "down_payment_below_minimum");
        assert_eq!(json["errors"][0]["category"], "motor");
        let minimum: rust_decimal::Decimal = json["errors"][0]["minimum"].as_str().unwrap().parse().unwrap();
        assert_eq!(minimum, dec!(0.15));
    }
}
