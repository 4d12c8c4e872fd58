//! serializable bundle of one simulation and everything derived from it

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    aggregate_by_year, calculate_baseline, check_coverage, compute_summary, detect_milestones,
    extra_interest_from_self_build, suggest_buffers, BufferSuggestion, CoverageReport, Milestone,
    SimulationSummary, YearSummary,
};
use crate::config::{Catalogue, SimulationOptions, SimulationState};
use crate::errors::Result;
use crate::rates::{resolve_all, ResolvedRatePeriod};
use crate::simulation::{simulate, SimulationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub result: SimulationResult,
    pub resolved_periods: Vec<ResolvedRatePeriod>,
    pub yearly: Vec<YearSummary>,
    pub milestones: Vec<Milestone>,
    pub buffer_suggestions: Vec<BufferSuggestion>,
    pub coverage: CoverageReport,
    pub summary: SimulationSummary,
}

impl SimulationReport {
    pub fn generate(state: &SimulationState, catalogue: &Catalogue) -> Self {
        Self::generate_with_options(state, catalogue, &SimulationOptions::default())
    }

    pub fn generate_with_options(
        state: &SimulationState,
        catalogue: &Catalogue,
        options: &SimulationOptions,
    ) -> Self {
        let result = simulate(state, catalogue);
        let resolved_periods = resolve_all(&state.rate_periods, catalogue);
        let baseline = calculate_baseline(state, catalogue);
        let extra = extra_interest_from_self_build(state, catalogue, options);
        let coverage = check_coverage(&state.rate_periods, catalogue, state.terms.term_months);
        if !coverage.is_complete() {
            debug!(
                "rate periods leave {} of {} months uncovered",
                coverage.uncovered_months.len(),
                coverage.term_months
            );
        }

        SimulationReport {
            yearly: aggregate_by_year(&result.months),
            milestones: detect_milestones(&result.months, state),
            buffer_suggestions: suggest_buffers(&resolved_periods, &result.months, state, catalogue),
            summary: compute_summary(
                &result.months,
                state.terms.term_months,
                baseline.total_interest,
                extra,
            ),
            coverage,
            resolved_periods,
            result,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
