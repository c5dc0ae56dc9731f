use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreditError {
    #[error("tenor must be at least one month")]
    ZeroTenor,

    #[error("financed principal must be positive: {principal}")]
    NonPositivePrincipal {
        principal: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("{fee} must not be negative: {amount}")]
    NegativeFee {
        fee: &'static str,
        amount: Money,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, CreditError>;

impl CreditError {
    /// arithmetic left the decimal range
    pub fn overflow(what: &str) -> Self {
        CreditError::CalculationError {
            message: format!("{what} overflows the supported decimal range"),
        }
    }
}
