/// fee treatments - compare spread, upfront and capitalized fees
use vehicle_credit_rs::chrono::NaiveDate;
use vehicle_credit_rs::{
    calculate_credit, CreditCalculationInput, FeeTreatment, InterestMethod, Money, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== fee treatment comparison ===\n");

    let base = CreditCalculationInput::new(
        Money::from_major(150_000_000),
        Money::from_major(30_000_000),
        36,
        Rate::from_percentage(8),
        Money::from_major(1_500_000),
        Money::from_major(11_250_000),
    );

    for treatment in [FeeTreatment::Spread, FeeTreatment::Upfront, FeeTreatment::Capitalized] {
        let result = calculate_credit(&base.clone().with_fee_treatment(treatment))?;
        println!("{treatment:?}");
        println!("  due at signing:      {}", result.upfront_payment);
        println!("  monthly installment: {}", result.monthly_installment);
        println!("  total interest:      {}", result.total_interest);
        println!("  total payable:       {}\n", result.total_payable);
    }

    // reducing balance with a dated schedule
    let first_due = NaiveDate::from_ymd_opt(2025, 1, 31).ok_or("invalid date")?;
    let annuity = calculate_credit(
        &base
            .with_interest_method(InterestMethod::Annuity)
            .with_first_due_date(first_due),
    )?;

    println!("=== annuity schedule (first 3 months) ===");
    for row in annuity.schedule.iter().take(3) {
        let due = row.due_date.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "{:>2} {} installment {} principal {} interest {} balance {}",
            row.period, due, row.installment, row.principal_portion, row.interest_portion, row.ending_balance
        );
    }

    Ok(())
}
