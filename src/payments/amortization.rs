use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// interest and principal split of one scheduled installment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSplit {
    pub interest: Money,
    pub principal: Money,
}

/// level monthly installment that repays `principal` over `months`
pub fn calculate_monthly_payment(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if !principal.is_positive() {
        return Money::ZERO;
    }
    if months == 0 {
        return principal;
    }

    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return principal / Decimal::from(months);
    }

    // payment = P * r * (1 + r)^n / ((1 + r)^n - 1)
    let base = Decimal::ONE + r;
    let payment = (0..months)
        .try_fold(Decimal::ONE, |compound, _| compound.checked_mul(base))
        .and_then(|compound| {
            let numerator = principal.as_decimal().checked_mul(r)?.checked_mul(compound)?;
            numerator.checked_div(compound - Decimal::ONE)
        });

    match payment {
        Some(payment) => Money::from_decimal(payment),
        // (1 + r)^n past the decimal range; the annuity has converged to P * r
        None => principal.monthly_interest(annual_rate),
    }
}

/// interest due for one month with no capital repaid
pub fn calculate_interest_only_payment(balance: Money, annual_rate: Rate) -> Money {
    balance.monthly_interest(annual_rate)
}

/// split an installment; principal never exceeds the balance
pub fn split_payment(balance: Money, payment: Money, annual_rate: Rate) -> PaymentSplit {
    let interest = balance.monthly_interest(annual_rate);
    let principal = payment.saturating_sub(interest).min(balance);
    PaymentSplit {
        interest,
        principal,
    }
}

/// months left in the term including `month`, never less than one
pub fn remaining_months(term_months: u32, month: u32) -> u32 {
    (term_months + 1).saturating_sub(month).max(1)
}
