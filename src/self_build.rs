use serde::{Deserialize, Serialize};

use crate::config::SelfBuildConfig;
use crate::decimal::Money;
use crate::types::{ConstructionRepaymentType, SelfBuildPhase};

/// self-build state recorded on each ledger month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfBuildMonth {
    pub phase: SelfBuildPhase,
    pub drawdown_this_month: Money,
    pub cumulative_drawn: Money,
    pub is_interest_only: bool,
}

/// enabled with at least one drawdown stage
pub fn is_self_build_active(config: Option<&SelfBuildConfig>) -> bool {
    config.is_some_and(|c| c.enabled && !c.drawdown_stages.is_empty())
}

/// drawdown schedule and phase rules for a self-build mortgage
#[derive(Debug, Clone, Copy)]
pub struct SelfBuildTracker<'a> {
    config: &'a SelfBuildConfig,
    construction_end: u32,
}

impl<'a> SelfBuildTracker<'a> {
    /// None unless self-build is active
    pub fn new(config: Option<&'a SelfBuildConfig>) -> Option<Self> {
        if !is_self_build_active(config) {
            return None;
        }
        let config = config?;
        let construction_end = config
            .drawdown_stages
            .iter()
            .map(|s| s.month)
            .max()
            .unwrap_or(0);
        Some(Self {
            config,
            construction_end,
        })
    }

    /// month of the last drawdown
    pub fn construction_end_month(&self) -> u32 {
        self.construction_end
    }

    /// total of every stage scheduled in `month`
    pub fn get_drawdown_for_month(&self, month: u32) -> Money {
        self.config
            .drawdown_stages
            .iter()
            .filter(|s| s.month == month)
            .map(|s| s.amount)
            .sum()
    }

    pub fn total_scheduled(&self) -> Money {
        self.config.drawdown_stages.iter().map(|s| s.amount).sum()
    }

    pub fn has_outstanding_drawdowns(&self, month: u32) -> bool {
        self.config.drawdown_stages.iter().any(|s| s.month > month)
    }

    pub fn determine_phase(&self, month: u32) -> SelfBuildPhase {
        if month <= self.construction_end {
            SelfBuildPhase::Construction
        } else {
            SelfBuildPhase::Repayment
        }
    }

    /// last interest-only month; interest-only plans may run past construction
    pub fn interest_only_end_month(&self) -> u32 {
        match self.config.construction_repayment_type {
            ConstructionRepaymentType::InterestOnly => {
                self.construction_end.max(self.config.interest_only_months)
            }
            ConstructionRepaymentType::InterestAndCapital => self.construction_end,
        }
    }

    pub fn is_interest_only_month(&self, month: u32) -> bool {
        month <= self.interest_only_end_month()
    }

    /// stages add up to exactly the mortgage amount
    pub fn validate_drawdown_total(&self, mortgage_amount: Money) -> bool {
        self.total_scheduled() == mortgage_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawdownStage;

    fn config(repayment: ConstructionRepaymentType, interest_only_months: u32) -> SelfBuildConfig {
        SelfBuildConfig::new(
            vec![
                DrawdownStage::new(1, Money::from_minor(100_000)),
                DrawdownStage::new(4, Money::from_minor(50_000)),
                DrawdownStage::new(4, Money::from_minor(25_000)),
                DrawdownStage::new(8, Money::from_minor(25_000)),
            ],
            repayment,
            interest_only_months,
        )
    }

    #[test]
    fn test_inactive_without_stages_or_when_disabled() {
        let mut empty = config(ConstructionRepaymentType::InterestOnly, 0);
        empty.drawdown_stages.clear();
        assert!(SelfBuildTracker::new(Some(&empty)).is_none());

        let mut disabled = config(ConstructionRepaymentType::InterestOnly, 0);
        disabled.enabled = false;
        assert!(!is_self_build_active(Some(&disabled)));
        assert!(!is_self_build_active(None));
    }

    #[test]
    fn test_co_scheduled_stages_are_summed() {
        let config = config(ConstructionRepaymentType::InterestOnly, 0);
        let tracker = SelfBuildTracker::new(Some(&config)).unwrap();

        assert_eq!(tracker.get_drawdown_for_month(4), Money::from_minor(75_000));
        assert_eq!(tracker.get_drawdown_for_month(5), Money::ZERO);
        assert_eq!(tracker.construction_end_month(), 8);
        assert!(tracker.has_outstanding_drawdowns(7));
        assert!(!tracker.has_outstanding_drawdowns(8));
    }

    #[test]
    fn test_phases() {
        let config = config(ConstructionRepaymentType::InterestOnly, 0);
        let tracker = SelfBuildTracker::new(Some(&config)).unwrap();

        assert_eq!(tracker.determine_phase(8), SelfBuildPhase::Construction);
        assert_eq!(tracker.determine_phase(9), SelfBuildPhase::Repayment);
    }

    #[test]
    fn test_interest_only_extends_past_construction() {
        let config = config(ConstructionRepaymentType::InterestOnly, 12);
        let tracker = SelfBuildTracker::new(Some(&config)).unwrap();

        assert!(tracker.is_interest_only_month(12));
        assert!(!tracker.is_interest_only_month(13));
        assert_eq!(tracker.interest_only_end_month(), 12);
    }

    #[test]
    fn test_interest_and_capital_confined_to_construction() {
        let config = config(ConstructionRepaymentType::InterestAndCapital, 12);
        let tracker = SelfBuildTracker::new(Some(&config)).unwrap();

        assert!(tracker.is_interest_only_month(8));
        assert!(!tracker.is_interest_only_month(9));
    }

    #[test]
    fn test_validate_drawdown_total() {
        let config = config(ConstructionRepaymentType::InterestOnly, 0);
        let tracker = SelfBuildTracker::new(Some(&config)).unwrap();

        assert!(tracker.validate_drawdown_total(Money::from_minor(200_000)));
        assert!(!tracker.validate_drawdown_total(Money::from_minor(250_000)));
    }
}
