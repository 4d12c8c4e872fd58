pub mod labels;
pub mod periods;
pub mod resolver;

pub use labels::{DefaultLabeler, PeriodLabeler};
pub use periods::{PeriodDuration, RatePeriod, RatePeriodStack};
pub use resolver::{
    find_rate_period_for_month, resolve_all, resolve_rate_period, resolve_rate_period_with,
    ResolvedRatePeriod,
};
