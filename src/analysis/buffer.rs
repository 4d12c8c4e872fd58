use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Catalogue, MortgageRate, SimulationState};
use crate::decimal::{Money, Rate};
use crate::rates::ResolvedRatePeriod;
use crate::simulation::AmortizationMonth;
use crate::types::RateType;

/// a fixed period that does not roll onto its lender's follow-on rate
///
/// Switching lender or product at the end of a fixed term usually takes a
/// few weeks; adding a short period on the follow-on rate models that gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferSuggestion {
    /// index of the fixed period among the resolved periods
    pub period_index: usize,
    pub period_id: Uuid,
    pub period_label: String,
    pub fixed_end_month: u32,
    pub balance_at_end: Money,
    pub ltv_at_end: Option<Decimal>,
    pub follow_on_rate_id: String,
    pub follow_on_lender_id: String,
    pub follow_on_name: String,
    pub follow_on_rate: Rate,
    /// None when the fixed period is the last one
    pub next_period_id: Option<Uuid>,
    pub is_trailing: bool,
    pub message: String,
}

/// the variable rate a lender moves a borrower onto when a fixed term ends
///
/// Existing-customer rates win over new-business ones, then the lowest rate.
pub fn find_follow_on_rate<'a>(
    lender_id: &str,
    is_btl: bool,
    ltv: Decimal,
    catalogue: &'a Catalogue,
) -> Option<&'a MortgageRate> {
    catalogue
        .rates
        .iter()
        .filter(|r| {
            r.lender_id == lender_id
                && r.rate_type == RateType::Variable
                && r.is_buy_to_let() == is_btl
                && r.covers_ltv(ltv)
        })
        .min_by(|a, b| {
            a.new_business
                .cmp(&b.new_business)
                .then_with(|| a.rate.cmp(&b.rate))
        })
}

fn is_follow_on(next: &ResolvedRatePeriod, follow_on: &MortgageRate) -> bool {
    !next.is_custom && next.rate_id == follow_on.id && next.lender_id == follow_on.lender_id
}

/// suggest follow-on buffers after fixed periods
pub fn suggest_buffers(
    periods: &[ResolvedRatePeriod],
    ledger: &[AmortizationMonth],
    state: &SimulationState,
    catalogue: &Catalogue,
) -> Vec<BufferSuggestion> {
    let terms = &state.terms;
    let is_btl = terms.buyer_type.is_buy_to_let();
    let mut suggestions = Vec::new();

    for (index, period) in periods.iter().enumerate() {
        if !period.is_fixed() {
            continue;
        }
        let next = periods.get(index + 1);
        // only a bounded fixed period can trail off the end of the stack
        let Some(end_month) = period.end_month() else {
            continue;
        };

        let balance_at_end = ledger
            .iter()
            .find(|m| m.month == end_month)
            .map_or(terms.amount, |m| m.closing_balance);
        let ltv_at_end = terms.ltv_for(balance_at_end);

        let Some(follow_on) = find_follow_on_rate(
            &period.lender_id,
            is_btl,
            ltv_at_end.unwrap_or(Decimal::ONE_HUNDRED),
            catalogue,
        ) else {
            continue;
        };

        if next.is_some_and(|n| is_follow_on(n, follow_on)) {
            continue;
        }

        let follow_on_rate = Rate::from_percent(follow_on.rate);
        let message = match next {
            Some(_) => format!(
                "{} ends in month {}; consider a buffer on {} ({}) before switching",
                period.label, end_month, follow_on.name, follow_on_rate
            ),
            None => format!(
                "{} ends in month {} with nothing after it; {} rolls onto {} ({})",
                period.label, end_month, period.lender_name, follow_on.name, follow_on_rate
            ),
        };

        suggestions.push(BufferSuggestion {
            period_index: index,
            period_id: period.id,
            period_label: period.label.clone(),
            fixed_end_month: end_month,
            balance_at_end,
            ltv_at_end,
            follow_on_rate_id: follow_on.id.clone(),
            follow_on_lender_id: follow_on.lender_id.clone(),
            follow_on_name: follow_on.name.clone(),
            follow_on_rate,
            next_period_id: next.map(|n| n.id),
            is_trailing: next.is_none(),
            message,
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Lender, MortgageTerms};
    use crate::rates::{resolve_all, PeriodDuration, RatePeriod, RatePeriodStack};
    use crate::simulation::simulate;
    use crate::types::BuyerType;
    use rust_decimal_macros::dec;

    fn rate(id: &str, rate_type: RateType, percent: Decimal, new_business: bool) -> MortgageRate {
        MortgageRate {
            id: id.to_string(),
            lender_id: "aib".to_string(),
            name: id.to_string(),
            rate_type,
            rate: percent,
            fixed_term: if rate_type == RateType::Fixed { Some(3) } else { None },
            min_ltv: dec!(0),
            max_ltv: dec!(90),
            buyer_types: vec![],
            ber_eligible: None,
            new_business,
        }
    }

    fn catalogue() -> Catalogue {
        Catalogue::new()
            .with_rate(rate("aib-3y", RateType::Fixed, dec!(3.5), true))
            .with_rate(rate("aib-svr", RateType::Variable, dec!(4.15), false))
            .with_rate(rate("aib-tracker", RateType::Variable, dec!(3.95), true))
            .with_rate(MortgageRate {
                buyer_types: vec![BuyerType::BuyToLet],
                ..rate("aib-btl-svr", RateType::Variable, dec!(5.1), false)
            })
            .with_lender(Lender {
                id: "aib".to_string(),
                name: "AIB".to_string(),
                overpayment_policy_id: None,
            })
    }

    fn run(periods: Vec<RatePeriod>) -> Vec<BufferSuggestion> {
        let state = SimulationState::new(
            MortgageTerms::new(Money::from_minor(30_000_000), 360, Money::from_minor(40_000_000)),
            RatePeriodStack::new(periods).unwrap(),
        );
        let catalogue = catalogue();
        let resolved = resolve_all(&state.rate_periods, &catalogue);
        let ledger = simulate(&state, &catalogue).months;
        suggest_buffers(&resolved, &ledger, &state, &catalogue)
    }

    #[test]
    fn test_existing_customer_rate_preferred() {
        let catalogue = catalogue();
        let follow_on = find_follow_on_rate("aib", false, dec!(70), &catalogue).unwrap();
        assert_eq!(follow_on.id, "aib-svr");

        let btl = find_follow_on_rate("aib", true, dec!(70), &catalogue).unwrap();
        assert_eq!(btl.id, "aib-btl-svr");

        assert!(find_follow_on_rate("aib", false, dec!(95), &catalogue).is_none());
        assert!(find_follow_on_rate("boi", false, dec!(70), &catalogue).is_none());
    }

    #[test]
    fn test_natural_follow_on_needs_no_buffer() {
        let suggestions = run(vec![
            RatePeriod::new("aib", "aib-3y", PeriodDuration::Bounded(36)),
            RatePeriod::new("aib", "aib-svr", PeriodDuration::UntilEnd),
        ]);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_scenario_other_variable_rate_gets_one_buffer() {
        let suggestions = run(vec![
            RatePeriod::new("aib", "aib-3y", PeriodDuration::Bounded(36)),
            RatePeriod::new("aib", "aib-tracker", PeriodDuration::UntilEnd),
        ]);

        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.period_index, 0);
        assert!(!suggestion.is_trailing);
        assert_eq!(suggestion.fixed_end_month, 36);
        assert_eq!(suggestion.follow_on_rate_id, "aib-svr");
        assert!(suggestion.balance_at_end < Money::from_minor(30_000_000));
        assert!(suggestion.next_period_id.is_some());
    }

    #[test]
    fn test_trailing_fixed_period() {
        let suggestions = run(vec![
            RatePeriod::new("aib", "aib-svr", PeriodDuration::Bounded(12)),
            RatePeriod::new("aib", "aib-3y", PeriodDuration::Bounded(36)),
        ]);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].period_index, 1);
        assert!(suggestions[0].is_trailing);
        assert_eq!(suggestions[0].fixed_end_month, 48);
    }

    #[test]
    fn test_custom_follow_on_does_not_match() {
        let periods = vec![
            RatePeriod::new("aib", "aib-3y", PeriodDuration::Bounded(36)),
            RatePeriod::custom("aib", "aib-svr", PeriodDuration::UntilEnd),
        ];
        let catalogue = catalogue();
        let stack = RatePeriodStack::new(periods).unwrap();
        let state = SimulationState::new(
            MortgageTerms::new(Money::from_minor(30_000_000), 360, Money::from_minor(40_000_000)),
            stack,
        );
        let mut resolved = resolve_all(&state.rate_periods, &catalogue);
        // the custom rate is not in the catalogue, so build its resolved form by hand
        let mut custom = resolved[0].clone();
        custom.id = state.rate_periods.periods()[1].id;
        custom.rate_id = "aib-svr".to_string();
        custom.is_custom = true;
        custom.kind = crate::types::RateKind::Variable;
        custom.start_month = 37;
        custom.duration = PeriodDuration::UntilEnd;
        resolved.push(custom);

        let suggestions = suggest_buffers(&resolved, &[], &state, &catalogue);
        assert_eq!(suggestions.len(), 1);
        // no ledger, so the original amount is used
        assert_eq!(suggestions[0].balance_at_end, Money::from_minor(30_000_000));
    }
}
