use log::trace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Catalogue;
use crate::decimal::Rate;
use crate::types::{RateKind, RateType};

use super::labels::{DefaultLabeler, PeriodLabeler};
use super::periods::{PeriodDuration, RatePeriod, RatePeriodStack};

/// a rate period with catalogue attributes and its absolute start month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRatePeriod {
    pub id: Uuid,
    pub lender_id: String,
    pub rate_id: String,
    pub is_custom: bool,
    pub rate: Rate,
    pub kind: RateKind,
    pub duration: PeriodDuration,
    pub lender_name: String,
    pub rate_name: String,
    pub start_month: u32,
    /// only set for fixed rates
    pub overpayment_policy_id: Option<String>,
    pub label: String,
}

impl ResolvedRatePeriod {
    pub fn is_fixed(&self) -> bool {
        self.kind.is_fixed()
    }

    /// last covered month, None when running until the end
    pub fn end_month(&self) -> Option<u32> {
        self.duration.end_month(self.start_month)
    }

    /// fixed period with a known end
    pub fn is_bounded_fixed(&self) -> bool {
        self.is_fixed() && !self.duration.is_until_end()
    }

    pub fn contains(&self, month: u32) -> bool {
        month >= self.start_month && self.end_month().map_or(true, |end| month <= end)
    }
}

/// period covering `month` together with its start month
pub fn find_rate_period_for_month(stack: &RatePeriodStack, month: u32) -> Option<(&RatePeriod, u32)> {
    stack.find_for_month(month)
}

/// resolve with the default label format
pub fn resolve_rate_period(
    period: &RatePeriod,
    start_month: u32,
    catalogue: &Catalogue,
) -> Option<ResolvedRatePeriod> {
    resolve_rate_period_with(period, start_month, catalogue, &DefaultLabeler)
}

/// resolve catalogue attributes; None when the referenced rate is missing
pub fn resolve_rate_period_with(
    period: &RatePeriod,
    start_month: u32,
    catalogue: &Catalogue,
    labeler: &dyn PeriodLabeler,
) -> Option<ResolvedRatePeriod> {
    let (rate_type, rate_percent, fixed_term, rate_name, lender_name) = if period.is_custom {
        let custom = catalogue.custom_rate(&period.rate_id)?;
        let lender_name = if custom.lender_name.is_empty() {
            lender_name_for(catalogue, &period.lender_id)
        } else {
            custom.lender_name.clone()
        };
        (
            custom.rate_type,
            custom.rate,
            custom.fixed_term,
            custom.name.clone(),
            lender_name,
        )
    } else {
        let rate = catalogue.rate(&period.rate_id, &period.lender_id)?;
        (
            rate.rate_type,
            rate.rate,
            rate.fixed_term,
            rate.name.clone(),
            lender_name_for(catalogue, &period.lender_id),
        )
    };

    let kind = rate_kind(rate_type, fixed_term);
    let rate = Rate::from_percent(rate_percent);

    // lenders only restrict overpayments while a rate is fixed
    let overpayment_policy_id = if kind.is_fixed() {
        catalogue
            .lender(&period.lender_id)
            .and_then(|l| l.overpayment_policy_id.clone())
    } else {
        None
    };

    let label = period
        .label
        .clone()
        .unwrap_or_else(|| labeler.label(&lender_name, kind, rate));

    Some(ResolvedRatePeriod {
        id: period.id,
        lender_id: period.lender_id.clone(),
        rate_id: period.rate_id.clone(),
        is_custom: period.is_custom,
        rate,
        kind,
        duration: period.duration,
        lender_name,
        rate_name,
        start_month,
        overpayment_policy_id,
        label,
    })
}

/// resolve every period of the stack, skipping ones whose rate is missing
pub fn resolve_all(stack: &RatePeriodStack, catalogue: &Catalogue) -> Vec<ResolvedRatePeriod> {
    stack
        .with_start_months()
        .filter_map(|(period, start)| {
            let resolved = resolve_rate_period(period, start, catalogue);
            if resolved.is_none() {
                trace!("rate {} for lender {} not found", period.rate_id, period.lender_id);
            }
            resolved
        })
        .collect()
}

fn rate_kind(rate_type: RateType, fixed_term: Option<u32>) -> RateKind {
    match rate_type {
        RateType::Fixed => RateKind::Fixed {
            term_years: fixed_term,
        },
        RateType::Variable => RateKind::Variable,
    }
}

fn lender_name_for(catalogue: &Catalogue, lender_id: &str) -> String {
    catalogue
        .lender(lender_id)
        .map(|l| l.name.clone())
        .unwrap_or_else(|| lender_id.to_string())
}
