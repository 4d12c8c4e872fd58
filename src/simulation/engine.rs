use chrono::Datelike;
use log::{debug, trace};
use uuid::Uuid;

use crate::config::{Catalogue, SimulationState};
use crate::decimal::Money;
use crate::payments::{
    calculate_interest_only_payment, calculate_monthly_payment, get_overpayment_for_month,
    remaining_months, split_payment, AllowanceKey, AllowanceTracker, MonthContext,
    TransactionCounter,
};
use crate::rates::resolve_all;
use crate::self_build::{SelfBuildMonth, SelfBuildTracker};
use crate::types::YearBucket;
use crate::warnings::{SimulationWarning, WarningLog};

use super::ledger::{AmortizationMonth, SimulationResult};

/// run the month-by-month amortization for one scenario
///
/// Never fails: months without a resolvable rate period are skipped, and
/// degenerate inputs produce an empty result. All allowance, transaction
/// and year-start tracking is local to this call.
pub fn simulate(state: &SimulationState, catalogue: &Catalogue) -> SimulationResult {
    let terms = &state.terms;
    if terms.is_degenerate() || state.rate_periods.is_empty() {
        debug!("degenerate simulation input, returning empty ledger");
        return SimulationResult::default();
    }

    let periods = resolve_all(&state.rate_periods, catalogue);
    let self_build = SelfBuildTracker::new(state.self_build.as_ref());

    debug!(
        "simulating {} over {} months with {} rate periods, {} overpayments, self-build {}",
        terms.amount,
        terms.term_months,
        periods.len(),
        state.overpayments.len(),
        self_build.is_some()
    );

    // self-build balances grow from zero as stages are drawn
    let mut balance = if self_build.is_some() {
        Money::ZERO
    } else {
        terms.amount
    };
    let mut cumulative_drawn = Money::ZERO;
    let mut payment: Option<Money> = None;
    let mut current_period: Option<Uuid> = None;
    let mut was_interest_only = false;
    let mut early_redemptions: Vec<Uuid> = Vec::new();

    let mut cumulative_interest = Money::ZERO;
    let mut cumulative_principal = Money::ZERO;
    let mut cumulative_overpayments = Money::ZERO;
    let mut cumulative_reduce_term = Money::ZERO;

    let mut allowances = AllowanceTracker::new();
    let mut transactions = TransactionCounter::new();
    let mut warnings = WarningLog::new();
    let mut months = Vec::with_capacity(terms.term_months as usize);
    let mut applied = Vec::new();

    let mut month = 1u32;
    while month <= terms.term_months
        || self_build.is_some_and(|sb| sb.has_outstanding_drawdowns(month - 1))
    {
        let Some(period) = periods.iter().find(|p| p.contains(month)) else {
            trace!("month {month}: no rate period covers this month, skipping");
            month += 1;
            continue;
        };

        let date = terms.date_for_month(month);
        let rate = period.rate;
        let opening_balance = balance;

        let mut drawdown = Money::ZERO;
        let mut interest_only = false;
        if let Some(sb) = &self_build {
            drawdown = sb
                .get_drawdown_for_month(month)
                .min(terms.amount.saturating_sub(cumulative_drawn));
            balance += drawdown;
            cumulative_drawn += drawdown;
            interest_only = sb.is_interest_only_month(month);
        }

        let period_changed = current_period != Some(period.id);
        let leaving_interest_only = was_interest_only && !interest_only;
        let drawdown_changed_balance =
            self_build.is_some() && !interest_only && drawdown.is_positive();

        if !interest_only
            && (period_changed
                || payment.is_none()
                || leaving_interest_only
                || drawdown_changed_balance)
        {
            // size the schedule as if reduce_term overpayments had not been made
            let basis = balance + cumulative_reduce_term;
            let months_left = remaining_months(terms.term_months, month);
            let recalculated = calculate_monthly_payment(basis, rate, months_left);
            trace!("month {month}: payment set to {recalculated} over {months_left} months");
            payment = Some(recalculated);
        }

        let (interest, principal) = if interest_only {
            (calculate_interest_only_payment(balance, rate), Money::ZERO)
        } else {
            let split = split_payment(balance, payment.unwrap_or(Money::ZERO), rate);
            // the last scheduled month clears any rounding residual
            if month >= terms.term_months {
                (split.interest, balance)
            } else {
                (split.interest, split.principal)
            }
        };
        let scheduled_payment = interest + principal;

        let year = match date {
            Some(d) => YearBucket::Calendar(d.year()),
            None => YearBucket::mortgage_year(month),
        };
        let key = AllowanceKey {
            rate_period_id: period.id,
            year,
        };
        let bucket = allowances.enter(key, balance);

        let ctx = MonthContext {
            month,
            date,
            max_amount: balance.saturating_sub(principal),
            period,
            policies: &catalogue.policies,
            yearly_so_far: bucket.paid,
            current_balance: balance,
            current_payment: scheduled_payment,
            year_start_balance: bucket.year_start_balance,
        };
        let overpayments =
            get_overpayment_for_month(&ctx, &state.overpayments, &mut transactions, &mut warnings);
        let overpayment = overpayments.total;
        allowances.record(key, overpayment);

        let closing_balance = balance.saturating_sub(principal + overpayment);

        if closing_balance.is_settled()
            && balance.is_positive()
            && !early_redemptions.contains(&period.id)
        {
            if let Some(end) = period.end_month().filter(|end| period.is_fixed() && month < *end) {
                early_redemptions.push(period.id);
                debug!("month {month}: balance cleared before fixed period ends in month {end}");
                warnings.emit(SimulationWarning::early_redemption(
                    month,
                    Some(period.label.clone()),
                    format!(
                        "Mortgage is paid off in month {} before the fixed period ends in month {}; early redemption fees may apply",
                        month, end
                    ),
                ));
            }
        }

        cumulative_interest += interest;
        cumulative_principal += principal;
        cumulative_overpayments += overpayment;
        cumulative_reduce_term += overpayments.reduce_term_portion();

        months.push(AmortizationMonth {
            month,
            date,
            opening_balance,
            closing_balance,
            scheduled_payment,
            interest,
            principal,
            overpayment,
            total_payment: scheduled_payment + overpayment,
            cumulative_interest,
            cumulative_principal,
            cumulative_overpayments,
            rate,
            rate_period_id: period.id,
            self_build: self_build.map(|sb| SelfBuildMonth {
                phase: sb.determine_phase(month),
                drawdown_this_month: drawdown,
                cumulative_drawn,
                is_interest_only: interest_only,
            }),
        });

        // only the reduce_payment share lowers future installments
        let reduce_payment = overpayments.reduce_payment_portion();
        if overpayment.is_positive() && !period.is_fixed() && reduce_payment.is_positive() {
            if let (Some(current), Some(ratio)) = (
                payment.as_mut(),
                closing_balance.ratio_to(closing_balance + reduce_payment),
            ) {
                *current = *current * ratio;
            }
        }
        applied.extend(overpayments.applied);

        balance = closing_balance;
        current_period = Some(period.id);
        was_interest_only = interest_only;

        let drawdowns_pending = self_build.is_some_and(|sb| sb.has_outstanding_drawdowns(month));
        if balance.is_settled() && !drawdowns_pending {
            break;
        }
        month += 1;
    }

    debug!(
        "simulation finished after {} months with {} warnings",
        months.len(),
        warnings.len()
    );

    SimulationResult {
        months,
        applied_overpayments: applied,
        warnings: warnings.take_warnings(),
    }
}
