pub mod analysis;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod payments;
pub mod rates;
pub mod report;
pub mod self_build;
pub mod simulation;
pub mod types;
pub mod warnings;

// re-export key types
pub use analysis::{
    aggregate_by_year, calculate_baseline, check_coverage, compare_scenarios, compute_summary,
    detect_milestones, extra_interest_from_self_build, find_follow_on_rate, suggest_buffers,
    Baseline, BufferSuggestion, CoverageReport, Milestone, SimulationSummary, YearSummary,
};
pub use config::{
    Catalogue, CustomRate, DrawdownStage, Lender, MortgageRate, MortgageTerms, OverpaymentConfig,
    OverpaymentPolicy, SelfBuildConfig, SimulationOptions, SimulationState,
};
pub use decimal::{Money, Rate};
pub use errors::{Result, SimulationError};
pub use payments::{calculate_allowance, calculate_monthly_payment, AppliedOverpayment};
pub use rates::{
    resolve_all, resolve_rate_period, DefaultLabeler, PeriodDuration, PeriodLabeler, RatePeriod,
    RatePeriodStack, ResolvedRatePeriod,
};
pub use report::SimulationReport;
pub use self_build::{is_self_build_active, SelfBuildMonth, SelfBuildTracker};
pub use simulation::{simulate, AmortizationMonth, SimulationResult};
pub use types::{
    AllowanceBasis, AllowanceType, BuyerType, ConstructionRepaymentType, MilestoneKind,
    OverpaymentEffect, OverpaymentFrequency, OverpaymentKind, RateKind, RateType, SelfBuildPhase,
    Severity, TransactionPeriod, WarningKind, YearBucket,
};
pub use warnings::{SimulationWarning, WarningLog};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
