//! credit simulation endpoint, independent of any HTTP framework
//!
//! the transport layer resolves the caller and the JSON body, then hands both
//! here and writes back the returned status and body

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use tracing::{info, warn};

use crate::calculator::{calculate_credit, CreditCalculationInput};
use crate::config::CreditPolicy;
use crate::decimal::{Money, Rate};
use crate::errors::CreditError;
use crate::types::{FeeTreatment, InterestMethod, VehicleCategory, VehicleCondition};
use crate::validation::PolicyViolation;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// authenticated caller as resolved by the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
}

impl Caller {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// one malformed or missing request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// parsed simulation request, overrides left unset fall back to the policy
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub vehicle_price: Money,
    pub down_payment: Money,
    pub tenor: i64,
    /// annual flat rate in percent
    pub interest_rate: Option<Decimal>,
    pub admin_fee: Option<Money>,
    pub insurance_fee: Option<Money>,
    pub vehicle_category: VehicleCategory,
    pub vehicle_condition: VehicleCondition,
    pub interest_method: Option<InterestMethod>,
    pub fee_treatment: Option<FeeTreatment>,
    pub first_due_date: Option<NaiveDate>,
}

impl SimulationRequest {
    /// parse a request body, reporting every bad field at once
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(fields) = body.as_object() else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };

        let mut errors = Vec::new();

        let vehicle_price = required(fields, "vehiclePrice", parse_decimal, &mut errors);
        let down_payment = required(fields, "downPayment", parse_decimal, &mut errors);
        let tenor = required(fields, "tenor", parse_whole_number, &mut errors);
        let interest_rate = optional(fields, "interestRate", parse_decimal, &mut errors);
        let admin_fee = optional(fields, "adminFee", parse_decimal, &mut errors);
        let insurance_fee = optional(fields, "insuranceFee", parse_decimal, &mut errors);
        let vehicle_category = optional(fields, "vehicleCategory", parse_name, &mut errors);
        let vehicle_condition = optional(fields, "vehicleCondition", parse_name, &mut errors);
        let interest_method = optional(fields, "interestMethod", parse_serde_name, &mut errors);
        let fee_treatment = optional(fields, "feeTreatment", parse_serde_name, &mut errors);
        let first_due_date = optional(fields, "firstDueDate", parse_date, &mut errors);

        match (vehicle_price, down_payment, tenor) {
            (Some(vehicle_price), Some(down_payment), Some(tenor)) if errors.is_empty() => Ok(Self {
                vehicle_price: Money::from_decimal(vehicle_price),
                down_payment: Money::from_decimal(down_payment),
                tenor,
                interest_rate: interest_rate.flatten(),
                admin_fee: admin_fee.flatten().map(Money::from_decimal),
                insurance_fee: insurance_fee.flatten().map(Money::from_decimal),
                vehicle_category: vehicle_category.flatten().unwrap_or(VehicleCategory::Mobil),
                vehicle_condition: vehicle_condition.flatten().unwrap_or(VehicleCondition::Baru),
                interest_method: interest_method.flatten(),
                fee_treatment: fee_treatment.flatten(),
                first_due_date: first_due_date.flatten(),
            }),
            _ => Err(errors),
        }
    }
}

/// status code and JSON body to send back
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResponse {
    pub status: u16,
    pub body: Value,
}

impl SimulationResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn failure(status: u16, error: &str) -> Self {
        Self::new(status, json!({ "success": false, "error": error }))
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// handle a credit simulation request end to end
pub fn simulate_credit(caller: Option<&Caller>, body: &Value, policy: &CreditPolicy) -> SimulationResponse {
    let Some(caller) = caller else {
        warn!("rejected unauthenticated credit simulation");
        return SimulationResponse::failure(STATUS_UNAUTHORIZED, "Unauthorized");
    };

    let request = match SimulationRequest::from_json(body) {
        Ok(request) => request,
        Err(details) => {
            warn!(subject = %caller.subject, fields = details.len(), "invalid credit simulation request");
            return SimulationResponse::new(
                STATUS_BAD_REQUEST,
                json!({
                    "success": false,
                    "error": "Invalid request body",
                    "details": details,
                }),
            );
        }
    };

    let mut validation = policy.validate_application(
        request.vehicle_price,
        request.down_payment,
        request.tenor,
        request.vehicle_category,
        request.vehicle_condition,
    );

    let interest_rate = request.interest_rate.map(Rate::from_percentage_decimal);
    if let Some(rate) = interest_rate.filter(Rate::is_negative) {
        validation.reject(PolicyViolation::NegativeInterestRate { interest_rate: rate });
    }
    if let Some(amount) = request.admin_fee.filter(Money::is_negative) {
        validation.reject(PolicyViolation::NegativeFee {
            fee: "admin fee",
            amount,
        });
    }
    if let Some(amount) = request.insurance_fee.filter(Money::is_negative) {
        validation.reject(PolicyViolation::NegativeFee {
            fee: "insurance fee",
            amount,
        });
    }

    if !validation.is_valid {
        warn!(
            subject = %caller.subject,
            category = %request.vehicle_category,
            condition = %request.vehicle_condition,
            errors = ?validation.error_messages(),
            "credit application rejected"
        );
        return SimulationResponse::new(
            STATUS_BAD_REQUEST,
            json!({
                "success": false,
                "error": "Credit application is not valid",
                "errors": validation.error_messages(),
                "warnings": validation.warning_messages(),
            }),
        );
    }

    let input = match build_input(&request, interest_rate, policy) {
        Ok(input) => input,
        Err(e) => return calculation_failed(caller, &e),
    };

    let result = match calculate_credit(&input) {
        Ok(result) => result,
        Err(e) => return calculation_failed(caller, &e),
    };

    let mut data = match serde_json::to_value(&result) {
        Ok(Value::Object(data)) => data,
        Ok(_) | Err(_) => {
            warn!(subject = %caller.subject, "credit result could not be serialized");
            return SimulationResponse::failure(STATUS_INTERNAL_ERROR, "Internal server error");
        }
    };
    data.insert("vehicleCategory".into(), json!(request.vehicle_category));
    data.insert("vehicleCondition".into(), json!(request.vehicle_condition));
    data.insert("warnings".into(), json!(validation.warning_messages()));

    info!(
        subject = %caller.subject,
        category = %request.vehicle_category,
        condition = %request.vehicle_condition,
        tenor = input.tenor,
        monthly_installment = %result.monthly_installment,
        warnings = validation.warnings.len(),
        "credit simulated"
    );

    SimulationResponse::new(STATUS_OK, json!({ "success": true, "data": data }))
}

/// fill unset overrides from the policy
fn build_input(
    request: &SimulationRequest,
    interest_rate: Option<Rate>,
    policy: &CreditPolicy,
) -> Result<CreditCalculationInput, CreditError> {
    let tenor = u32::try_from(request.tenor).map_err(|_| CreditError::CalculationError {
        message: format!("tenor of {} months is out of range", request.tenor),
    })?;
    let category = request.vehicle_category;
    let condition = request.vehicle_condition;

    let interest_rate =
        interest_rate.unwrap_or_else(|| policy.default_interest_rate(category, condition, tenor));
    let admin_fee = match request.admin_fee {
        Some(fee) => fee,
        None => policy.default_admin_fee(request.vehicle_price, category)?,
    };
    let insurance_fee = match request.insurance_fee {
        Some(fee) => fee,
        None => policy.default_insurance_fee(request.vehicle_price, category, condition, tenor)?,
    };

    let mut input = CreditCalculationInput::new(
        request.vehicle_price,
        request.down_payment,
        tenor,
        interest_rate,
        admin_fee,
        insurance_fee,
    )
    .with_interest_method(request.interest_method.unwrap_or(policy.conventions.interest_method))
    .with_fee_treatment(request.fee_treatment.unwrap_or(policy.conventions.fee_treatment));

    if let Some(first_due_date) = request.first_due_date {
        input = input.with_first_due_date(first_due_date);
    }

    Ok(input)
}

fn calculation_failed(caller: &Caller, error: &CreditError) -> SimulationResponse {
    warn!(subject = %caller.subject, %error, "credit calculation failed");
    SimulationResponse::new(
        STATUS_UNPROCESSABLE,
        json!({
            "success": false,
            "error": "Credit calculation failed",
            "details": error.to_string(),
        }),
    )
}

/// `Some(None)` when the field is absent or null, `None` when it failed to parse
fn optional<T>(
    fields: &Map<String, Value>,
    name: &'static str,
    parse: fn(&Value) -> Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<Option<T>> {
    match fields.get(name) {
        None | Some(Value::Null) => Some(None),
        Some(value) => match parse(value) {
            Ok(parsed) => Some(Some(parsed)),
            Err(message) => {
                errors.push(FieldError::new(name, message));
                None
            }
        },
    }
}

fn required<T>(
    fields: &Map<String, Value>,
    name: &'static str,
    parse: fn(&Value) -> Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match optional(fields, name, parse, errors) {
        Some(Some(value)) => Some(value),
        Some(None) => {
            errors.push(FieldError::new(name, "is required"));
            None
        }
        None => None,
    }
}

/// numbers are read through their decimal text, never through f64
fn parse_decimal(value: &Value) -> Result<Decimal, String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err("must be a number".to_string()),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| "must be a number".to_string())
}

fn parse_whole_number(value: &Value) -> Result<i64, String> {
    let number = parse_decimal(value)?;
    if !number.fract().is_zero() {
        return Err("must be a whole number of months".to_string());
    }
    number
        .to_i64()
        .ok_or_else(|| "is out of range".to_string())
}

fn parse_name<T>(value: &Value) -> Result<T, String>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .as_str()
        .ok_or_else(|| "must be a string".to_string())
        .and_then(|s| s.parse::<T>().map_err(|e| e.to_string()))
}

fn parse_serde_name<T: DeserializeOwned>(value: &Value) -> Result<T, String> {
    T::deserialize(value).map_err(|e| e.to_string())
}

fn parse_date(value: &Value) -> Result<NaiveDate, String> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| "must be a date in YYYY-MM-DD format".to_string())
}
