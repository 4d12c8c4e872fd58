/// overpayments - lender allowances, warnings and savings against the baseline
use mortgage_sim::{
    Catalogue, Lender, Money, MortgageRate, MortgageTerms, OverpaymentConfig, OverpaymentEffect,
    OverpaymentFrequency, OverpaymentPolicy, PeriodDuration, RatePeriod, RatePeriodStack,
    RateType, SimulationReport, SimulationState, TransactionPeriod,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== overpayments example ===\n");

    // 10% of the balance per year, at most 12 overpayments a year
    let policy = OverpaymentPolicy::percentage_of_balance("boi-10", dec!(10))
        .with_transaction_limit(12, TransactionPeriod::Year);

    let catalogue = Catalogue::new()
        .with_rate(MortgageRate {
            id: "boi-4y".to_string(),
            lender_id: "boi".to_string(),
            name: "4 Year Fixed".to_string(),
            rate_type: RateType::Fixed,
            rate: dec!(3.75),
            fixed_term: Some(4),
            min_ltv: dec!(0),
            max_ltv: dec!(90),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: true,
        })
        .with_rate(MortgageRate {
            id: "boi-svr".to_string(),
            lender_id: "boi".to_string(),
            name: "Variable".to_string(),
            rate_type: RateType::Variable,
            rate: dec!(4.4),
            fixed_term: None,
            min_ltv: dec!(0),
            max_ltv: dec!(90),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: false,
        })
        .with_lender(Lender {
            id: "boi".to_string(),
            name: "Bank of Ireland".to_string(),
            overpayment_policy_id: Some(policy.id.clone()),
        })
        .with_policy(policy);

    let terms = MortgageTerms::new(Money::from_major(250_000), 300, Money::from_major(320_000))
        .with_start_date(NaiveDate::from_ymd_opt(2026, 3, 1).ok_or("bad date")?);

    let state = SimulationState::new(
        terms,
        RatePeriodStack::new(vec![
            RatePeriod::new("boi", "boi-4y", PeriodDuration::Bounded(48)),
            RatePeriod::new("boi", "boi-svr", PeriodDuration::UntilEnd),
        ])?,
    )
    .with_overpayment(
        OverpaymentConfig::recurring(
            Money::from_major(500),
            1,
            None,
            OverpaymentFrequency::Monthly,
            OverpaymentEffect::ReduceTerm,
        )
        .with_label("monthly top-up"),
    )
    // a bonus that breaks the yearly allowance
    .with_overpayment(
        OverpaymentConfig::one_time(Money::from_major(25_000), 10, OverpaymentEffect::ReduceTerm)
            .with_label("bonus"),
    );

    let report = SimulationReport::generate(&state, &catalogue);

    println!("warnings:");
    for warning in &report.result.warnings {
        println!("  [{:?}] month {}: {}", warning.severity, warning.month, warning.message);
    }

    let summary = &report.summary;
    println!("\ninterest paid (cents):  {}", summary.total_interest);
    println!("interest saved (cents): {}", summary.interest_saved);
    println!("term: {} months ({} saved)", summary.actual_term_months, summary.months_saved);

    Ok(())
}
