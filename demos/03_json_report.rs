/// json report - load a scenario from json and compare it with an overpaying variant
use mortgage_sim::{
    compare_scenarios, Catalogue, Money, OverpaymentConfig, OverpaymentEffect,
    SafeTimeProvider, SimulationState, TimeSource,
};
use chrono::{TimeZone, Utc};

const CATALOGUE: &str = r#"{
    "rates": [
        { "id": "avant-5y", "lender_id": "avant", "name": "5 Year Fixed", "type": "fixed",
          "rate": "3.45", "fixed_term": 5, "max_ltv": "80", "new_business": true },
        { "id": "avant-svr", "lender_id": "avant", "name": "Variable", "type": "variable",
          "rate": "4.25", "new_business": false }
    ],
    "lenders": [ { "id": "avant", "name": "Avant Money", "overpayment_policy_id": "avant-flat" } ],
    "policies": [ { "id": "avant-flat", "allowance_type": "flat", "allowance_basis": "balance",
                    "allowance_value": "1000000" } ]
}"#;

const STATE: &str = r#"{
    "terms": { "amount": "28000000", "term_months": 300, "property_value": "40000000" },
    "rate_periods": [
        { "id": "6f1c1a52-8a0e-4a57-9c5e-0d8c6b1f2a01", "lender_id": "avant",
          "rate_id": "avant-5y", "duration_months": 60 },
        { "id": "6f1c1a52-8a0e-4a57-9c5e-0d8c6b1f2a02", "lender_id": "avant",
          "rate_id": "avant-tracker", "duration_months": 0 }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== json report example ===\n");

    let catalogue = Catalogue::from_json(CATALOGUE)?;
    let mut state = SimulationState::from_json(STATE)?;

    // anchor calendar years to a fixed clock
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 5, 14, 0, 0, 0).single().ok_or("bad time")?,
    ));
    state.terms = state.terms.clone().starting_next_month(&time)?;

    let overpaying = state.clone().with_overpayment(OverpaymentConfig::one_time(
        Money::from_major(15_000),
        13,
        OverpaymentEffect::ReducePayment,
    ));

    let reports = compare_scenarios(&[state, overpaying], &catalogue)?;

    // the second period references a rate that is not in the catalogue
    let coverage = &reports[0].coverage;
    println!(
        "coverage complete: {} (first gap in month {:?})",
        coverage.is_complete(),
        coverage.first_uncovered_month()
    );
    for suggestion in &reports[0].buffer_suggestions {
        println!("buffer: {}", suggestion.message);
    }

    println!("\n{}", reports[1].to_json()?);

    Ok(())
}
