use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// vehicle category, drives rate tables, tenor limits and fee floors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    /// two-wheel
    Motor,
    /// four-wheel
    Mobil,
}

/// vehicle condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCondition {
    /// new
    Baru,
    /// used
    Bekas,
}

/// how interest is charged over the tenor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// interest computed once on the original amount and spread evenly
    #[default]
    Flat,
    /// reducing balance, equal installments
    Annuity,
}

/// where admin and insurance fees are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTreatment {
    /// added to the installments, no interest charged on them
    #[default]
    Spread,
    /// paid at signing together with the down payment
    Upfront,
    /// added to the financed amount and charged interest
    Capitalized,
}

/// error returned when a category or condition name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("must be one of: {expected}")]
pub struct UnknownVariant {
    pub expected: &'static str,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Motor, VehicleCategory::Mobil];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Motor => "motor",
            VehicleCategory::Mobil => "mobil",
        }
    }
}

impl VehicleCondition {
    pub const ALL: [VehicleCondition; 2] = [VehicleCondition::Baru, VehicleCondition::Bekas];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCondition::Baru => "baru",
            VehicleCondition::Bekas => "bekas",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VehicleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "motor" | "motorcycle" => Ok(VehicleCategory::Motor),
            "mobil" | "car" => Ok(VehicleCategory::Mobil),
            _ => Err(UnknownVariant { expected: "motor, mobil" }),
        }
    }
}

impl FromStr for VehicleCondition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baru" | "new" => Ok(VehicleCondition::Baru),
            "bekas" | "used" => Ok(VehicleCondition::Bekas),
            _ => Err(UnknownVariant { expected: "baru, bekas" }),
        }
    }
}
