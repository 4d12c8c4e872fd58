use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::SimulationState;
use crate::decimal::Money;
use crate::self_build::SelfBuildTracker;
use crate::simulation::AmortizationMonth;
use crate::types::MilestoneKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub month: u32,
    pub date: Option<NaiveDate>,
    pub label: String,
    /// balance at the milestone, drawn total for construction_complete
    pub value: Money,
}

const PRINCIPAL_THRESHOLDS: [(MilestoneKind, Decimal, &str); 3] = [
    (MilestoneKind::Principal25Percent, dec!(0.75), "25% of principal repaid"),
    (MilestoneKind::Principal50Percent, dec!(0.50), "50% of principal repaid"),
    (MilestoneKind::Principal75Percent, dec!(0.25), "75% of principal repaid"),
];

const LTV_THRESHOLD: Decimal = dec!(0.80);

struct Found {
    milestones: Vec<Milestone>,
}

impl Found {
    fn has(&self, kind: MilestoneKind) -> bool {
        self.milestones.iter().any(|m| m.kind == kind)
    }

    fn push(&mut self, kind: MilestoneKind, month: &AmortizationMonth, label: &str, value: Money) {
        if !self.has(kind) {
            self.milestones.push(Milestone {
                kind,
                month: month.month,
                date: month.date,
                label: label.to_string(),
                value,
            });
        }
    }
}

/// scan the ledger once and record each milestone the first time it is reached
///
/// For self-build mortgages the construction and principal milestones only
/// mean something when the drawdown stages add up to the mortgage amount.
/// Principal and LTV milestones wait until interest-only payments have ended.
pub fn detect_milestones(ledger: &[AmortizationMonth], state: &SimulationState) -> Vec<Milestone> {
    let terms = &state.terms;
    let mut found = Found {
        milestones: Vec::new(),
    };
    let Some(first) = ledger.first() else {
        return found.milestones;
    };

    let self_build = SelfBuildTracker::new(state.self_build.as_ref());
    let drawdowns_complete = self_build.map_or(true, |sb| sb.validate_drawdown_total(terms.amount));
    let interest_only_end = self_build.map_or(0, |sb| sb.interest_only_end_month());

    let ltv_limit = terms.property_value * LTV_THRESHOLD;
    let track_ltv = terms.amount > ltv_limit && terms.property_value.is_positive();

    found.push(MilestoneKind::MortgageStart, first, "Mortgage starts", terms.amount);

    for month in ledger {
        let balance = month.closing_balance;

        if let (Some(sb), true) = (&self_build, drawdowns_complete) {
            if month.month == sb.construction_end_month() {
                let drawn = month.self_build.map_or(terms.amount, |s| s.cumulative_drawn);
                found.push(MilestoneKind::ConstructionComplete, month, "Construction complete", drawn);
            }
            if interest_only_end > sb.construction_end_month() && month.month == interest_only_end + 1 {
                found.push(MilestoneKind::FullPaymentsStart, month, "Full payments start", month.opening_balance);
            }
        }

        let past_interest_only = month.month > interest_only_end;

        if past_interest_only && drawdowns_complete {
            for (kind, fraction, label) in PRINCIPAL_THRESHOLDS {
                if balance <= terms.amount * fraction {
                    found.push(kind, month, label, balance);
                }
            }
        }
        if past_interest_only && track_ltv && balance <= ltv_limit {
            found.push(MilestoneKind::Ltv80Percent, month, "Loan to value below 80%", balance);
        }

        let drawing = self_build.is_some_and(|sb| sb.has_outstanding_drawdowns(month.month));
        if balance.is_settled() && !drawing {
            found.push(MilestoneKind::MortgageComplete, month, "Mortgage paid off", Money::ZERO);
            break;
        }
    }

    found.milestones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Catalogue, DrawdownStage, MortgageRate, MortgageTerms, SelfBuildConfig};
    use crate::rates::{PeriodDuration, RatePeriod, RatePeriodStack};
    use crate::simulation::simulate;
    use crate::types::{ConstructionRepaymentType, RateType};

    fn catalogue() -> Catalogue {
        Catalogue::new().with_rate(MortgageRate {
            id: "svr".to_string(),
            lender_id: "avant".to_string(),
            name: "Variable".to_string(),
            rate_type: RateType::Variable,
            rate: dec!(3.9),
            fixed_term: None,
            min_ltv: dec!(0),
            max_ltv: dec!(100),
            buyer_types: vec![],
            ber_eligible: None,
            new_business: true,
        })
    }

    fn state(amount: i64, property_value: i64) -> SimulationState {
        SimulationState::new(
            MortgageTerms::new(Money::from_minor(amount), 240, Money::from_minor(property_value)),
            RatePeriodStack::new(vec![RatePeriod::new("avant", "svr", PeriodDuration::UntilEnd)])
                .unwrap(),
        )
    }

    fn kinds(milestones: &[Milestone]) -> Vec<MilestoneKind> {
        milestones.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn test_plain_mortgage_milestones_in_order() {
        let state = state(9_000_000, 10_000_000);
        let ledger = simulate(&state, &catalogue()).months;
        let milestones = detect_milestones(&ledger, &state);

        assert_eq!(
            kinds(&milestones),
            vec![
                MilestoneKind::MortgageStart,
                MilestoneKind::Ltv80Percent,
                MilestoneKind::Principal25Percent,
                MilestoneKind::Principal50Percent,
                MilestoneKind::Principal75Percent,
                MilestoneKind::MortgageComplete,
            ]
        );
        for pair in milestones.windows(2) {
            assert!(pair[0].month <= pair[1].month);
        }
        assert_eq!(milestones.last().unwrap().month, ledger.len() as u32);
    }

    #[test]
    fn test_ltv_milestone_needs_high_starting_ltv() {
        let state = state(5_000_000, 10_000_000);
        let ledger = simulate(&state, &catalogue()).months;
        let milestones = detect_milestones(&ledger, &state);

        assert!(!kinds(&milestones).contains(&MilestoneKind::Ltv80Percent));
    }

    #[test]
    fn test_scenario_incomplete_drawdowns_suppress_construction_and_principal() {
        let state = state(9_000_000, 10_000_000).with_self_build(SelfBuildConfig::new(
            vec![
                DrawdownStage::new(1, Money::from_minor(4_000_000)),
                DrawdownStage::new(5, Money::from_minor(3_000_000)),
            ],
            ConstructionRepaymentType::InterestOnly,
            12,
        ));
        let ledger = simulate(&state, &catalogue()).months;
        let found = kinds(&detect_milestones(&ledger, &state));

        assert!(found.contains(&MilestoneKind::MortgageStart));
        assert!(!found.contains(&MilestoneKind::ConstructionComplete));
        assert!(!found.contains(&MilestoneKind::FullPaymentsStart));
        assert!(!found.contains(&MilestoneKind::Principal25Percent));
        assert!(!found.contains(&MilestoneKind::Principal50Percent));
        assert!(!found.contains(&MilestoneKind::Principal75Percent));
    }

    #[test]
    fn test_ltv_milestone_reported_when_drawdowns_fall_short() {
        let state = state(9_000_000, 10_000_000).with_self_build(SelfBuildConfig::new(
            vec![
                DrawdownStage::new(1, Money::from_minor(5_000_000)),
                DrawdownStage::new(6, Money::from_minor(3_550_000)),
            ],
            ConstructionRepaymentType::InterestOnly,
            12,
        ));
        let ledger = simulate(&state, &catalogue()).months;
        let milestones = detect_milestones(&ledger, &state);

        let crossing = ledger
            .iter()
            .find(|m| m.month > 12 && m.closing_balance <= Money::from_minor(8_000_000))
            .unwrap();
        let ltv = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::Ltv80Percent)
            .unwrap();
        assert_eq!(ltv.month, crossing.month);
        assert!(ltv.month > 12);
        assert!(!kinds(&milestones).contains(&MilestoneKind::Principal25Percent));
    }

    #[test]
    fn test_self_build_milestones() {
        let state = state(9_000_000, 10_000_000).with_self_build(SelfBuildConfig::new(
            vec![
                DrawdownStage::new(1, Money::from_minor(5_000_000)),
                DrawdownStage::new(6, Money::from_minor(4_000_000)),
            ],
            ConstructionRepaymentType::InterestOnly,
            12,
        ));
        let ledger = simulate(&state, &catalogue()).months;
        let milestones = detect_milestones(&ledger, &state);

        let construction = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::ConstructionComplete)
            .unwrap();
        assert_eq!(construction.month, 6);
        assert_eq!(construction.value, Money::from_minor(9_000_000));

        let full = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::FullPaymentsStart)
            .unwrap();
        assert_eq!(full.month, 13);

        let quarter = milestones
            .iter()
            .find(|m| m.kind == MilestoneKind::Principal25Percent)
            .unwrap();
        assert!(quarter.month > 12);
        for pair in milestones.windows(2) {
            assert!(pair[0].month <= pair[1].month);
        }
    }

    #[test]
    fn test_no_full_payments_milestone_when_interest_only_ends_with_construction() {
        let state = state(9_000_000, 10_000_000).with_self_build(SelfBuildConfig::new(
            vec![
                DrawdownStage::new(1, Money::from_minor(5_000_000)),
                DrawdownStage::new(6, Money::from_minor(4_000_000)),
            ],
            ConstructionRepaymentType::InterestAndCapital,
            12,
        ));
        let ledger = simulate(&state, &catalogue()).months;
        let found = kinds(&detect_milestones(&ledger, &state));

        assert!(found.contains(&MilestoneKind::ConstructionComplete));
        assert!(!found.contains(&MilestoneKind::FullPaymentsStart));
    }

    #[test]
    fn test_empty_ledger_has_no_milestones() {
        assert!(detect_milestones(&[], &state(100, 200)).is_empty());
    }
}
