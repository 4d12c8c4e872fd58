use log::debug;

use crate::config::{Catalogue, SimulationOptions, SimulationState};
use crate::errors::{Result, SimulationError};
use crate::report::SimulationReport;

/// most scenarios shown side by side
pub const MAX_COMPARISON_SCENARIOS: usize = 5;

/// independent reports for each scenario, in input order
pub fn compare_scenarios(
    states: &[SimulationState],
    catalogue: &Catalogue,
) -> Result<Vec<SimulationReport>> {
    compare_scenarios_with_options(states, catalogue, &SimulationOptions::default())
}

pub fn compare_scenarios_with_options(
    states: &[SimulationState],
    catalogue: &Catalogue,
    options: &SimulationOptions,
) -> Result<Vec<SimulationReport>> {
    if states.len() > options.max_comparison_scenarios {
        return Err(SimulationError::TooManyScenarios {
            max: options.max_comparison_scenarios,
            requested: states.len(),
        });
    }
    debug!("comparing {} scenarios", states.len());

    Ok(states
        .iter()
        .map(|state| SimulationReport::generate_with_options(state, catalogue, options))
        .collect())
}
