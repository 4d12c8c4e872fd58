use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{OverpaymentConfig, OverpaymentPolicy};
use crate::decimal::Money;
use crate::rates::ResolvedRatePeriod;
use crate::types::{OverpaymentEffect, OverpaymentKind, TransactionPeriod};
use crate::warnings::{SimulationWarning, WarningLog};

use super::allowance::calculate_allowance;

/// an overpayment that was actually made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOverpayment {
    pub month: u32,
    pub amount: Money,
    pub config_id: Uuid,
    pub is_recurring: bool,
    pub effect: OverpaymentEffect,
    pub within_allowance: bool,
    pub excess_amount: Money,
}

/// everything the applicator needs to know about the current month
#[derive(Debug, Clone, Copy)]
pub struct MonthContext<'a> {
    pub month: u32,
    pub date: Option<NaiveDate>,
    /// most that can be overpaid, the balance left after scheduled principal
    pub max_amount: Money,
    pub period: &'a ResolvedRatePeriod,
    pub policies: &'a [OverpaymentPolicy],
    /// overpaid so far in the current allowance bucket
    pub yearly_so_far: Money,
    pub current_balance: Money,
    pub current_payment: Money,
    pub year_start_balance: Money,
}

impl MonthContext<'_> {
    /// lender policy for the active period, fixed periods only
    pub fn policy(&self) -> Option<&OverpaymentPolicy> {
        let id = self.period.overpayment_policy_id.as_deref()?;
        self.policies.iter().find(|p| p.id == id)
    }
}

/// overpayments made in one month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthOverpayments {
    pub total: Money,
    pub applied: Vec<AppliedOverpayment>,
}

impl MonthOverpayments {
    /// share of this month's overpayment that should lower future installments
    pub fn reduce_payment_portion(&self) -> Money {
        self.portion(OverpaymentEffect::ReducePayment)
    }

    pub fn reduce_term_portion(&self) -> Money {
        self.portion(OverpaymentEffect::ReduceTerm)
    }

    fn portion(&self, effect: OverpaymentEffect) -> Money {
        self.applied
            .iter()
            .filter(|a| a.effect == effect)
            .map(|a| a.amount)
            .sum()
    }
}

/// window a transaction is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TransactionBucket {
    CalendarMonth(i32, u32),
    CalendarQuarter(i32, u32),
    CalendarYear(i32),
    MortgageMonth(u32),
    MortgageQuarter(u32),
    MortgageYear(u32),
    WholePeriod,
}

impl TransactionBucket {
    fn for_month(period: TransactionPeriod, month: u32, date: Option<NaiveDate>) -> Self {
        match (period, date) {
            (TransactionPeriod::FixedPeriod, _) => TransactionBucket::WholePeriod,
            (TransactionPeriod::Month, Some(d)) => TransactionBucket::CalendarMonth(d.year(), d.month()),
            (TransactionPeriod::Quarter, Some(d)) => {
                TransactionBucket::CalendarQuarter(d.year(), d.month().div_ceil(3))
            }
            (TransactionPeriod::Year, Some(d)) => TransactionBucket::CalendarYear(d.year()),
            (TransactionPeriod::Month, None) => TransactionBucket::MortgageMonth(month),
            (TransactionPeriod::Quarter, None) => TransactionBucket::MortgageQuarter(month.div_ceil(3)),
            (TransactionPeriod::Year, None) => TransactionBucket::MortgageYear(month.div_ceil(12)),
        }
    }
}

/// per-run count of overpayment transactions in each limit window
#[derive(Debug, Default)]
pub struct TransactionCounter {
    counts: HashMap<(Uuid, TransactionBucket), u32>,
}

impl TransactionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// count one transaction and return the new total for its window
    fn record(&mut self, rate_period_id: Uuid, bucket: TransactionBucket) -> u32 {
        let count = self.counts.entry((rate_period_id, bucket)).or_insert(0);
        *count += 1;
        *count
    }
}

/// whether a config fires in `month` under the active rate period
pub fn is_applicable(config: &OverpaymentConfig, month: u32, rate_period_id: Uuid) -> bool {
    if !config.enabled || !config.amount.is_positive() {
        return false;
    }
    if config.rate_period_id.is_some_and(|id| id != rate_period_id) {
        return false;
    }
    match config.kind {
        OverpaymentKind::OneTime => month == config.start_month,
        OverpaymentKind::Recurring => {
            if month < config.start_month {
                return false;
            }
            if config.end_month.is_some_and(|end| month > end) {
                return false;
            }
            (month - config.start_month) % config.frequency.interval_months() == 0
        }
    }
}

/// apply every configured overpayment that fires this month
///
/// Configs are taken in listing order and each is clipped to the room left
/// under `max_amount`. Allowance and transaction limits are advisory: an
/// overpayment above them is still made in full and a warning is logged.
pub fn get_overpayment_for_month(
    ctx: &MonthContext<'_>,
    configs: &[OverpaymentConfig],
    transactions: &mut TransactionCounter,
    warnings: &mut WarningLog,
) -> MonthOverpayments {
    let mut result = MonthOverpayments::default();
    if !ctx.max_amount.is_positive() {
        return result;
    }

    let is_fixed = ctx.period.is_fixed();
    let policy = ctx.policy();
    let monthly_allowance = policy
        .filter(|p| p.is_monthly_basis())
        .map(|p| calculate_allowance(Some(p), ctx.current_balance, ctx.current_payment, Money::ZERO));
    let mut yearly_so_far = ctx.yearly_so_far;

    for config in configs
        .iter()
        .filter(|c| is_applicable(c, ctx.month, ctx.period.id))
    {
        let room = ctx.max_amount.saturating_sub(result.total);
        if !room.is_positive() {
            break;
        }
        let amount = config.amount.min(room);

        let excess = if !is_fixed {
            Money::ZERO
        } else {
            let remaining = match (policy, monthly_allowance) {
                (None, _) => Money::ZERO,
                (Some(_), Some(allowance)) => allowance.saturating_sub(result.total),
                (Some(p), None) => calculate_allowance(
                    Some(p),
                    ctx.year_start_balance,
                    ctx.current_payment,
                    yearly_so_far,
                ),
            };
            amount.saturating_sub(remaining)
        };
        let within_allowance = excess.is_zero();

        if !within_allowance {
            debug!(
                "month {}: overpayment {} exceeds allowance by {}",
                ctx.month, config.id, excess
            );
            warnings.emit(SimulationWarning::allowance_exceeded(
                ctx.month,
                config.id,
                config.label.clone(),
                format!(
                    "Overpayment of {} in month {} exceeds the fee-free allowance by {}",
                    amount, ctx.month, excess
                ),
            ));
        }

        if let Some((max, window)) = policy.and_then(|p| p.max_transactions.zip(p.max_transactions_period)) {
            let bucket = TransactionBucket::for_month(window, ctx.month, ctx.date);
            let count = transactions.record(ctx.period.id, bucket);
            if count > max {
                warnings.emit(SimulationWarning::transaction_limit_exceeded(
                    ctx.month,
                    config.id,
                    config.label.clone(),
                    format!(
                        "Overpayment in month {} is transaction {} of at most {} per {:?}",
                        ctx.month, count, max, window
                    ),
                ));
            }
        }

        result.total += amount;
        yearly_so_far += amount;
        result.applied.push(AppliedOverpayment {
            month: ctx.month,
            amount,
            config_id: config.id,
            is_recurring: config.is_recurring(),
            effect: config.effect,
            within_allowance,
            excess_amount: excess,
        });
    }

    result
}
