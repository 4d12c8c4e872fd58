use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::simulation::AmortizationMonth;

/// headline figures for a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_interest: Money,
    pub total_paid: Money,
    pub actual_term_months: u32,
    pub interest_saved: Money,
    /// zero unless the ledger reached a zero balance
    pub months_saved: u32,
    pub extra_interest_from_self_build: Option<Money>,
}

pub fn compute_summary(
    ledger: &[AmortizationMonth],
    term_months: u32,
    baseline_interest: Money,
    extra_interest_from_self_build: Option<Money>,
) -> SimulationSummary {
    let (total_interest, total_paid, repaid) = match ledger.last() {
        Some(last) => (
            last.cumulative_interest,
            last.cumulative_interest + last.cumulative_principal + last.cumulative_overpayments,
            last.closing_balance.is_settled(),
        ),
        None => (Money::ZERO, Money::ZERO, false),
    };
    let actual_term_months = ledger.len() as u32;

    SimulationSummary {
        total_interest,
        total_paid,
        actual_term_months,
        interest_saved: baseline_interest.saturating_sub(total_interest),
        months_saved: if repaid {
            term_months.saturating_sub(actual_term_months)
        } else {
            0
        },
        extra_interest_from_self_build,
    }
}
