/// simulation endpoint - status codes and bodies the http layer sends back
use serde_json::json;
use vehicle_credit_rs::{simulate_credit, Caller, CreditPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let policy = CreditPolicy::standard();
    let caller = Caller::new("sales-01");

    let requests = [
        ("valid", Some(&caller), json!({ "vehiclePrice": 150000000, "downPayment": 30000000, "tenor": 36 })),
        ("anonymous", None, json!({ "vehiclePrice": 150000000, "downPayment": 30000000, "tenor": 36 })),
        ("malformed", Some(&caller), json!({ "vehiclePrice": "abc", "tenor": 1.5 })),
        (
            "low down payment",
            Some(&caller),
            json!({
                "vehiclePrice": 20000000,
                "downPayment": 1000000,
                "tenor": 24,
                "vehicleCategory": "motor",
                "vehicleCondition": "bekas"
            }),
        ),
    ];

    for (name, caller, body) in requests {
        let response = simulate_credit(caller, &body, &policy);
        println!("=== {name}: {} ===", response.status);
        if response.is_success() {
            let data = &response.body["data"];
            println!("monthly installment: {}", data["monthlyInstallment"]);
            println!("warnings: {}\n", data["warnings"]);
        } else {
            println!("{}\n", serde_json::to_string_pretty(&response.body)?);
        }
    }

    Ok(())
}
