/// custom policy - load dealership rules from json
use vehicle_credit_rs::{
    CalculationConventions, CreditPolicy, FeeTreatment, InterestMethod, Money, VehicleCategory,
    VehicleCondition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== custom policy example ===\n");

    // start from the standard rules and tighten used motorcycles
    let mut policy = CreditPolicy::standard().with_conventions(CalculationConventions {
        interest_method: InterestMethod::Annuity,
        fee_treatment: FeeTreatment::Capitalized,
    });
    policy.categories.motor.max_tenor = 36;
    policy.categories.motor.long_tenor_advisory_from = 30;
    policy.validate()?;

    let json = policy.to_json_string()?;
    let loaded = CreditPolicy::from_json_str(&json)?;
    println!("policy round-trips through json: {}", loaded == policy);

    let rate = loaded.default_interest_rate(VehicleCategory::Motor, VehicleCondition::Bekas, 30);
    println!("motor bekas 30 months: {rate}");

    let result = loaded.validate_application(
        Money::from_major(20_000_000),
        Money::from_major(4_000_000),
        42,
        VehicleCategory::Motor,
        VehicleCondition::Bekas,
    );
    println!("42 months allowed: {}", result.is_valid);
    for error in result.error_messages() {
        println!("  {error}");
    }

    // a broken policy is refused
    let broken = json.replacen("\"max_tenor\": 36", "\"max_tenor\": 0", 1);
    match CreditPolicy::from_json_str(&broken) {
        Ok(_) => println!("broken policy accepted"),
        Err(e) => println!("broken policy rejected: {e}"),
    }

    Ok(())
}
