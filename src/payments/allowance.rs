use std::collections::HashMap;

use uuid::Uuid;

use crate::config::OverpaymentPolicy;
use crate::decimal::Money;
use crate::types::{AllowanceBasis, AllowanceType, YearBucket};

/// fee-free overpayment capacity left under a lender policy
///
/// Balance-based and flat allowances are yearly and cumulative, so the amount
/// already overpaid this year is deducted. Payment-based allowances are
/// per month and ignore `already_paid_this_year`.
pub fn calculate_allowance(
    policy: Option<&OverpaymentPolicy>,
    balance: Money,
    monthly_payment: Money,
    already_paid_this_year: Money,
) -> Money {
    let Some(policy) = policy else {
        return Money::ZERO;
    };

    match (policy.allowance_type, policy.allowance_basis) {
        (AllowanceType::Percentage, AllowanceBasis::Balance) => balance
            .percentage(policy.allowance_value)
            .saturating_sub(already_paid_this_year),
        (AllowanceType::Percentage, AllowanceBasis::Monthly) => {
            let allowance = monthly_payment.percentage(policy.allowance_value);
            match policy.min_amount {
                Some(min) => allowance.max(min),
                None => allowance,
            }
        }
        (AllowanceType::Flat, _) => {
            Money::from_decimal(policy.allowance_value).saturating_sub(already_paid_this_year)
        }
    }
}

/// allowance bucket: one rate period within one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub rate_period_id: Uuid,
    pub year: YearBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceBucket {
    /// balance when the bucket was first seen; lenders fix the allowance here
    pub year_start_balance: Money,
    pub paid: Money,
}

/// per-run record of what has been overpaid in each allowance bucket
#[derive(Debug, Default)]
pub struct AllowanceTracker {
    buckets: HashMap<AllowanceKey, AllowanceBucket>,
}

impl AllowanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// bucket for `key`, snapshotting `balance` the first time it is seen
    pub fn enter(&mut self, key: AllowanceKey, balance: Money) -> AllowanceBucket {
        *self.buckets.entry(key).or_insert(AllowanceBucket {
            year_start_balance: balance,
            paid: Money::ZERO,
        })
    }

    pub fn record(&mut self, key: AllowanceKey, amount: Money) {
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.paid += amount;
        }
    }
}
