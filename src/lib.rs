pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod fees;
pub mod interest;
pub mod payments;
pub mod simulation;
pub mod types;
pub mod validation;

// re-export key types
pub use calculator::{calculate_credit, CreditCalculationInput, CreditCalculationResult};
pub use config::{CalculationConventions, CreditPolicy};
pub use decimal::{Money, Rate};
pub use errors::{CreditError, Result};
pub use fees::{calculate_default_admin_fee, calculate_default_insurance_fee};
pub use interest::{get_default_interest_rate, RateBracket, RateTable};
pub use payments::{InstallmentSchedule, ScheduledInstallment};
pub use simulation::{simulate_credit, Caller, FieldError, SimulationRequest, SimulationResponse};
pub use types::{FeeTreatment, InterestMethod, VehicleCategory, VehicleCondition};
pub use validation::{validate_credit_application, PolicyAdvisory, PolicyViolation, ValidationResult};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
