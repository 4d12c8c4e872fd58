/// self build - staged drawdowns with interest-only construction
use mortgage_sim::{
    Catalogue, ConstructionRepaymentType, DrawdownStage, Money, MortgageRate, MortgageTerms,
    PeriodDuration, RatePeriod, RatePeriodStack, RateType, SelfBuildConfig, SimulationReport,
    SimulationState,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== self build example ===\n");

    let catalogue = Catalogue::new().with_rate(MortgageRate {
        id: "haven-svr".to_string(),
        lender_id: "haven".to_string(),
        name: "Variable".to_string(),
        rate_type: RateType::Variable,
        rate: dec!(3.95),
        fixed_term: None,
        min_ltv: dec!(0),
        max_ltv: dec!(90),
        buyer_types: vec![],
        ber_eligible: None,
        new_business: true,
    });

    let stages = vec![
        DrawdownStage::new(1, Money::from_major(80_000)),
        DrawdownStage::new(4, Money::from_major(70_000)),
        DrawdownStage::new(8, Money::from_major(60_000)),
        DrawdownStage::new(12, Money::from_major(40_000)),
    ];

    let state = SimulationState::new(
        MortgageTerms::new(Money::from_major(250_000), 300, Money::from_major(350_000)),
        RatePeriodStack::new(vec![RatePeriod::new("haven", "haven-svr", PeriodDuration::UntilEnd)])?,
    )
    .with_self_build(SelfBuildConfig::new(stages, ConstructionRepaymentType::InterestOnly, 18));

    let report = SimulationReport::generate(&state, &catalogue);

    for month in report.result.months.iter().take(20) {
        if let Some(sb) = month.self_build {
            println!(
                "month {:>2} {:?}: drawn {:>9} payment {:>7} interest-only {}",
                month.month, sb.phase, sb.cumulative_drawn, month.scheduled_payment, sb.is_interest_only
            );
        }
    }

    println!("\nmilestones:");
    for milestone in &report.milestones {
        println!("  month {:>3}: {}", milestone.month, milestone.label);
    }

    if let Some(extra) = report.summary.extra_interest_from_self_build {
        println!("\ninterest-only construction costs an extra {} cents", extra);
    }

    Ok(())
}
