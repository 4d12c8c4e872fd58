/// quick start - minimal example to get started
use mortgage_sim::{
    simulate, Catalogue, Lender, Money, MortgageRate, MortgageTerms, PeriodDuration, RatePeriod,
    RatePeriodStack, RateType, SimulationState,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // one lender with a 3 year fix and its variable follow-on
    let catalogue = Catalogue::new()
        .with_rate(MortgageRate {
            id: "aib-3y".to_string(),
            lender_id: "aib".to_string(),
            name: "3 Year Fixed".to_string(),
            rate_type: RateType::Fixed,
            rate: dec!(3.5),
            fixed_term: Some(3),
            min_ltv: dec!(0),
            max_ltv: dec!(90),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: true,
        })
        .with_rate(MortgageRate {
            id: "aib-svr".to_string(),
            lender_id: "aib".to_string(),
            name: "Standard Variable".to_string(),
            rate_type: RateType::Variable,
            rate: dec!(4.15),
            fixed_term: None,
            min_ltv: dec!(0),
            max_ltv: dec!(90),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: false,
        })
        .with_lender(Lender {
            id: "aib".to_string(),
            name: "AIB".to_string(),
            overpayment_policy_id: None,
        });

    // 300,000 over 30 years, fixed for 3 then variable
    let state = SimulationState::new(
        MortgageTerms::new(Money::from_major(300_000), 360, Money::from_major(375_000)),
        RatePeriodStack::new(vec![
            RatePeriod::new("aib", "aib-3y", PeriodDuration::Bounded(36)),
            RatePeriod::new("aib", "aib-svr", PeriodDuration::UntilEnd),
        ])?,
    );

    let result = simulate(&state, &catalogue);

    for month in result.months.iter().filter(|m| m.month % 60 == 1 || m.month == 37) {
        println!(
            "month {:>3}: payment {:>8} interest {:>8} balance {:>10} @ {}",
            month.month, month.scheduled_payment, month.interest, month.closing_balance, month.rate
        );
    }
    println!("\nmonths: {}", result.months.len());
    println!("total interest (cents): {}", result.total_interest());

    Ok(())
}
