use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, SimulationError};

/// how long a rate period lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum PeriodDuration {
    /// a fixed number of months, never zero
    Bounded(u32),
    /// runs until the mortgage ends
    UntilEnd,
}

impl From<u32> for PeriodDuration {
    fn from(months: u32) -> Self {
        if months == 0 {
            PeriodDuration::UntilEnd
        } else {
            PeriodDuration::Bounded(months)
        }
    }
}

impl From<PeriodDuration> for u32 {
    fn from(duration: PeriodDuration) -> Self {
        match duration {
            PeriodDuration::Bounded(months) => months,
            PeriodDuration::UntilEnd => 0,
        }
    }
}

impl PeriodDuration {
    pub fn months(&self) -> Option<u32> {
        match self {
            PeriodDuration::Bounded(months) => Some(*months),
            PeriodDuration::UntilEnd => None,
        }
    }

    pub fn is_until_end(&self) -> bool {
        matches!(self, PeriodDuration::UntilEnd)
    }

    /// last month covered when starting at `start_month`
    pub fn end_month(&self, start_month: u32) -> Option<u32> {
        self.months().map(|m| start_month + m - 1)
    }
}

/// one entry of the caller's rate period stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePeriod {
    pub id: Uuid,
    pub lender_id: String,
    pub rate_id: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(rename = "duration_months")]
    pub duration: PeriodDuration,
    #[serde(default)]
    pub label: Option<String>,
}

impl RatePeriod {
    pub fn new(
        lender_id: impl Into<String>,
        rate_id: impl Into<String>,
        duration: PeriodDuration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lender_id: lender_id.into(),
            rate_id: rate_id.into(),
            is_custom: false,
            duration,
            label: None,
        }
    }

    /// a period backed by the custom rate catalogue
    pub fn custom(
        lender_id: impl Into<String>,
        rate_id: impl Into<String>,
        duration: PeriodDuration,
    ) -> Self {
        Self {
            is_custom: true,
            ..Self::new(lender_id, rate_id, duration)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn contains(&self, start_month: u32, month: u32) -> bool {
        if month < start_month {
            return false;
        }
        match self.duration.end_month(start_month) {
            Some(end) => month <= end,
            None => true,
        }
    }
}

/// ordered, contiguous rate periods; at most one runs until the end and it must be last
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RatePeriod>", into = "Vec<RatePeriod>")]
pub struct RatePeriodStack {
    periods: Vec<RatePeriod>,
}

impl RatePeriodStack {
    pub fn new(periods: Vec<RatePeriod>) -> Result<Self> {
        let count = periods.len();
        for (index, period) in periods.iter().enumerate() {
            match period.duration {
                PeriodDuration::Bounded(0) => {
                    return Err(SimulationError::InvalidRatePeriodStack {
                        message: format!("period {index} has a bounded duration of zero months"),
                    });
                }
                PeriodDuration::UntilEnd if index + 1 != count => {
                    return Err(SimulationError::InvalidRatePeriodStack {
                        message: format!(
                            "period {index} runs until the end of the mortgage but is not last"
                        ),
                    });
                }
                _ => {}
            }
        }
        Ok(Self { periods })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn periods(&self) -> &[RatePeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// periods paired with their derived start months
    pub fn with_start_months(&self) -> impl Iterator<Item = (&RatePeriod, u32)> + '_ {
        self.periods.iter().scan(1u32, |next_start, period| {
            let start = *next_start;
            *next_start = match period.duration.months() {
                Some(months) => start.saturating_add(months),
                None => u32::MAX,
            };
            Some((period, start))
        })
    }

    /// period covering `month` and its start month
    pub fn find_for_month(&self, month: u32) -> Option<(&RatePeriod, u32)> {
        self.with_start_months()
            .find(|(period, start)| period.contains(*start, month))
    }
}

impl TryFrom<Vec<RatePeriod>> for RatePeriodStack {
    type Error = SimulationError;

    fn try_from(periods: Vec<RatePeriod>) -> Result<Self> {
        RatePeriodStack::new(periods)
    }
}

impl From<RatePeriodStack> for Vec<RatePeriod> {
    fn from(stack: RatePeriodStack) -> Self {
        stack.periods
    }
}
