use serde::{Deserialize, Serialize};

use crate::config::Catalogue;
use crate::rates::{find_rate_period_for_month, resolve_rate_period, RatePeriodStack};

/// months of the term with no resolvable rate period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub term_months: u32,
    pub uncovered_months: Vec<u32>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.uncovered_months.is_empty()
    }

    pub fn first_uncovered_month(&self) -> Option<u32> {
        self.uncovered_months.first().copied()
    }

    pub fn covered_months(&self) -> u32 {
        self.term_months - self.uncovered_months.len() as u32
    }
}

/// which months of the term the simulation will skip
pub fn check_coverage(stack: &RatePeriodStack, catalogue: &Catalogue, term_months: u32) -> CoverageReport {
    let uncovered_months = (1..=term_months)
        .filter(|month| {
            find_rate_period_for_month(stack, *month)
                .and_then(|(period, start)| resolve_rate_period(period, start, catalogue))
                .is_none()
        })
        .collect();

    CoverageReport {
        term_months,
        uncovered_months,
    }
}
