/// quick start - price a credit with the standard policy
use vehicle_credit_rs::{
    calculate_credit, calculate_default_admin_fee, calculate_default_insurance_fee,
    get_default_interest_rate, validate_credit_application, CreditCalculationInput, Money,
    VehicleCategory, VehicleCondition,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // a new car for 150m with 30m down over 3 years
    let price = Money::from_major(150_000_000);
    let down_payment = Money::from_major(30_000_000);
    let tenor = 36;
    let (category, condition) = (VehicleCategory::Mobil, VehicleCondition::Baru);

    let validation = validate_credit_application(price, down_payment, tenor as i64, category, condition);
    if !validation.is_valid {
        for error in validation.error_messages() {
            println!("error: {error}");
        }
        return Ok(());
    }
    for warning in validation.warning_messages() {
        println!("warning: {warning}");
    }

    let input = CreditCalculationInput::new(
        price,
        down_payment,
        tenor,
        get_default_interest_rate(category, condition, tenor),
        calculate_default_admin_fee(price, category)?,
        calculate_default_insurance_fee(price, category, condition, tenor)?,
    );
    let result = calculate_credit(&input)?;

    println!("interest rate:       {}", result.interest_rate);
    println!("principal:           {}", result.principal);
    println!("total interest:      {}", result.total_interest);
    println!("monthly installment: {}", result.monthly_installment);
    println!("last installment:    {}", result.last_installment);
    println!("total payable:       {}", result.total_payable);
    println!("effective rate:      {}", result.effective_rate);

    Ok(())
}
