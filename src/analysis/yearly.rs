use chrono::Datelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::simulation::AmortizationMonth;
use crate::types::YearBucket;

/// ledger totals for one calendar or mortgage year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: YearBucket,
    pub months: u32,
    pub interest: Money,
    pub principal: Money,
    pub overpayments: Money,
    pub total_paid: Money,
    pub opening_balance: Money,
    pub closing_balance: Money,
    /// distinct periods active during the year, in order of appearance
    pub rate_period_ids: Vec<Uuid>,
}

impl YearSummary {
    fn starting(year: YearBucket, month: &AmortizationMonth) -> Self {
        Self {
            year,
            months: 0,
            interest: Money::ZERO,
            principal: Money::ZERO,
            overpayments: Money::ZERO,
            total_paid: Money::ZERO,
            opening_balance: month.opening_balance,
            closing_balance: month.closing_balance,
            rate_period_ids: Vec::new(),
        }
    }

    fn add(&mut self, month: &AmortizationMonth) {
        self.months += 1;
        self.interest += month.interest;
        self.principal += month.principal;
        self.overpayments += month.overpayment;
        self.total_paid += month.total_payment;
        self.closing_balance = month.closing_balance;
        if !self.rate_period_ids.contains(&month.rate_period_id) {
            self.rate_period_ids.push(month.rate_period_id);
        }
    }
}

fn year_of(month: &AmortizationMonth) -> YearBucket {
    match month.date {
        Some(date) => YearBucket::Calendar(date.year()),
        None => YearBucket::mortgage_year(month.month),
    }
}

/// group ledger months by calendar year when dated, else by mortgage year
pub fn aggregate_by_year(ledger: &[AmortizationMonth]) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();

    for month in ledger {
        let year = year_of(month);
        match years.last_mut() {
            Some(current) if current.year == year => current.add(month),
            _ => {
                let mut summary = YearSummary::starting(year, month);
                summary.add(month);
                years.push(summary);
            }
        }
    }

    years
}
