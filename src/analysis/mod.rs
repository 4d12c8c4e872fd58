pub mod baseline;
pub mod buffer;
pub mod comparison;
pub mod coverage;
pub mod milestones;
pub mod summary;
pub mod yearly;

pub use baseline::{calculate_baseline, extra_interest_from_self_build, Baseline};
pub use buffer::{find_follow_on_rate, suggest_buffers, BufferSuggestion};
pub use comparison::{compare_scenarios, compare_scenarios_with_options, MAX_COMPARISON_SCENARIOS};
pub use coverage::{check_coverage, CoverageReport};
pub use milestones::{detect_milestones, Milestone};
pub use summary::{compute_summary, SimulationSummary};
pub use yearly::{aggregate_by_year, YearSummary};
