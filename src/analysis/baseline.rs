use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{Catalogue, SimulationOptions, SimulationState};
use crate::decimal::Money;
use crate::self_build::is_self_build_active;
use crate::simulation::{simulate, SimulationResult};
use crate::types::ConstructionRepaymentType;

/// the same mortgage run with every overpayment removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub total_interest: Money,
    pub term_months: u32,
    pub reached_zero_balance: bool,
}

impl From<&SimulationResult> for Baseline {
    fn from(result: &SimulationResult) -> Self {
        Self {
            total_interest: result.total_interest(),
            term_months: result.months.len() as u32,
            reached_zero_balance: result.reached_zero_balance(),
        }
    }
}

pub fn calculate_baseline(state: &SimulationState, catalogue: &Catalogue) -> Baseline {
    Baseline::from(&simulate(&state.without_overpayments(), catalogue))
}

/// interest paid because construction was interest-only
///
/// Compares the overpayment-free baseline against the same self-build
/// repaying interest and capital during construction. None for other
/// mortgages and when the difference is within the noise threshold.
pub fn extra_interest_from_self_build(
    state: &SimulationState,
    catalogue: &Catalogue,
    options: &SimulationOptions,
) -> Option<Money> {
    let self_build = state.self_build.as_ref()?;
    if !is_self_build_active(Some(self_build))
        || self_build.construction_repayment_type != ConstructionRepaymentType::InterestOnly
    {
        return None;
    }

    let interest_only = calculate_baseline(state, catalogue);

    let mut with_capital = state.without_overpayments();
    if let Some(sb) = with_capital.self_build.as_mut() {
        sb.construction_repayment_type = ConstructionRepaymentType::InterestAndCapital;
    }
    let with_capital = Baseline::from(&simulate(&with_capital, catalogue));

    let extra = interest_only
        .total_interest
        .saturating_sub(with_capital.total_interest);
    debug!("interest-only construction costs {extra} over interest and capital");

    (extra > options.self_build_noise_threshold).then_some(extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DrawdownStage, MortgageRate, MortgageTerms, OverpaymentConfig, SelfBuildConfig,
    };
    use crate::rates::{PeriodDuration, RatePeriod, RatePeriodStack};
    use crate::types::{OverpaymentEffect, RateType};
    use rust_decimal_macros::dec;

    fn catalogue() -> Catalogue {
        Catalogue::new().with_rate(MortgageRate {
            id: "svr".to_string(),
            lender_id: "ptsb".to_string(),
            name: "Variable".to_string(),
            rate_type: RateType::Variable,
            rate: dec!(4.0),
            fixed_term: None,
            min_ltv: dec!(0),
            max_ltv: dec!(100),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: true,
        })
    }

    fn state(amount: i64) -> SimulationState {
        SimulationState::new(
            MortgageTerms::new(Money::from_minor(amount), 300, Money::from_minor(amount * 2)),
            RatePeriodStack::new(vec![RatePeriod::new("ptsb", "svr", PeriodDuration::UntilEnd)])
                .unwrap(),
        )
    }

    #[test]
    fn test_baseline_ignores_overpayments() {
        let plain = state(20_000_000);
        let overpaying = plain.clone().with_overpayment(OverpaymentConfig::one_time(
            Money::from_minor(1_000_000),
            24,
            OverpaymentEffect::ReduceTerm,
        ));

        let baseline = calculate_baseline(&overpaying, &catalogue());
        let actual = simulate(&overpaying, &catalogue());

        assert_eq!(baseline, Baseline::from(&simulate(&plain, &catalogue())));
        assert_eq!(baseline.term_months, 300);
        assert!(baseline.total_interest > actual.total_interest());
    }

    #[test]
    fn test_extra_interest_only_for_interest_only_self_build() {
        let options = SimulationOptions::default();
        assert_eq!(extra_interest_from_self_build(&state(20_000_000), &catalogue(), &options), None);

        let stages = vec![
            DrawdownStage::new(1, Money::from_minor(10_000_000)),
            DrawdownStage::new(6, Money::from_minor(10_000_000)),
        ];
        let interest_only = state(20_000_000).with_self_build(SelfBuildConfig::new(
            stages.clone(),
            crate::types::ConstructionRepaymentType::InterestOnly,
            18,
        ));
        let extra = extra_interest_from_self_build(&interest_only, &catalogue(), &options);
        assert!(extra.is_some_and(|e| e > options.self_build_noise_threshold));

        let with_capital = state(20_000_000).with_self_build(SelfBuildConfig::new(
            stages,
            crate::types::ConstructionRepaymentType::InterestAndCapital,
            18,
        ));
        assert_eq!(extra_interest_from_self_build(&with_capital, &catalogue(), &options), None);
    }

    #[test]
    fn test_small_difference_is_noise() {
        let options = SimulationOptions::default();
        // construction ends in month 1, so both runs are almost identical
        let state = state(20_000).with_self_build(SelfBuildConfig::new(
            vec![DrawdownStage::new(1, Money::from_minor(20_000))],
            crate::types::ConstructionRepaymentType::InterestOnly,
            0,
        ));
        assert_eq!(extra_interest_from_self_build(&state, &catalogue(), &options), None);
    }
}
