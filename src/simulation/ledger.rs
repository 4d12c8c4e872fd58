use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::payments::AppliedOverpayment;
use crate::self_build::SelfBuildMonth;
use crate::warnings::SimulationWarning;

/// one row of the amortization ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationMonth {
    pub month: u32,
    /// None when the mortgage has no start date
    pub date: Option<NaiveDate>,
    pub opening_balance: Money,
    pub closing_balance: Money,
    /// interest plus principal due this month
    pub scheduled_payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub overpayment: Money,
    /// scheduled payment plus overpayment
    pub total_payment: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
    pub cumulative_overpayments: Money,
    pub rate: Rate,
    pub rate_period_id: Uuid,
    pub self_build: Option<SelfBuildMonth>,
}

/// everything produced by one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub months: Vec<AmortizationMonth>,
    pub applied_overpayments: Vec<AppliedOverpayment>,
    pub warnings: Vec<SimulationWarning>,
}

impl SimulationResult {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn last_month(&self) -> Option<&AmortizationMonth> {
        self.months.last()
    }

    pub fn final_balance(&self) -> Option<Money> {
        self.last_month().map(|m| m.closing_balance)
    }

    /// the ledger ends with the mortgage repaid
    pub fn reached_zero_balance(&self) -> bool {
        self.final_balance().is_some_and(|b| b.is_settled())
    }

    pub fn total_interest(&self) -> Money {
        self.last_month()
            .map(|m| m.cumulative_interest)
            .unwrap_or(Money::ZERO)
    }

    /// interest, principal and overpayments paid over the ledger
    pub fn total_paid(&self) -> Money {
        self.last_month()
            .map(|m| m.cumulative_interest + m.cumulative_principal + m.cumulative_overpayments)
            .unwrap_or(Money::ZERO)
    }

    pub fn month(&self, month: u32) -> Option<&AmortizationMonth> {
        self.months.iter().find(|m| m.month == month)
    }
}
