use serde::{Deserialize, Serialize};

/// interest rate type as published by the lender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    Fixed,
    Variable,
}

/// rate type together with the fixed term, once a period is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum RateKind {
    Fixed { term_years: Option<u32> },
    Variable,
}

impl RateKind {
    pub fn is_fixed(&self) -> bool {
        matches!(self, RateKind::Fixed { .. })
    }
}

/// buyer categories a rate may be restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerType {
    FirstTimeBuyer,
    Mover,
    Switcher,
    BuyToLet,
}

impl BuyerType {
    pub fn is_buy_to_let(&self) -> bool {
        matches!(self, BuyerType::BuyToLet)
    }
}

/// one-off or repeating overpayment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentKind {
    OneTime,
    Recurring,
}

/// how often a recurring overpayment fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl OverpaymentFrequency {
    /// months between occurrences
    pub fn interval_months(&self) -> u32 {
        match self {
            OverpaymentFrequency::Monthly => 1,
            OverpaymentFrequency::Quarterly => 3,
            OverpaymentFrequency::Yearly => 12,
        }
    }
}

/// what an overpayment does to the rest of the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentEffect {
    /// keep the installment, finish sooner
    ReduceTerm,
    /// keep the term, lower the installment
    ReducePayment,
}

/// how a lender expresses its fee-free allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    Percentage,
    Flat,
}

/// what a percentage allowance is a percentage of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceBasis {
    /// outstanding balance, cumulative per year
    Balance,
    /// monthly installment, per month
    Monthly,
}

/// window over which a transaction limit is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPeriod {
    Month,
    Quarter,
    Year,
    FixedPeriod,
}

/// how the loan is repaid while the house is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionRepaymentType {
    InterestOnly,
    InterestAndCapital,
}

/// self-build phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfBuildPhase {
    Construction,
    Repayment,
}

/// simulation warning category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    AllowanceExceeded,
    TransactionLimitExceeded,
    EarlyRedemption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// advisory only
    Warning,
    /// financially significant, e.g. possible early redemption fees
    Error,
}

/// milestone category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    MortgageStart,
    ConstructionComplete,
    FullPaymentsStart,
    #[serde(rename = "principal_25_percent")]
    Principal25Percent,
    #[serde(rename = "principal_50_percent")]
    Principal50Percent,
    #[serde(rename = "principal_75_percent")]
    Principal75Percent,
    #[serde(rename = "ltv_80_percent")]
    Ltv80Percent,
    MortgageComplete,
}

/// year bucket used for allowance tracking and yearly aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "year")]
pub enum YearBucket {
    /// calendar year, when the mortgage has a start date
    Calendar(i32),
    /// mortgage year, ceil(month / 12)
    Mortgage(u32),
}

impl YearBucket {
    /// mortgage year for a 1-based month index
    pub fn mortgage_year(month: u32) -> Self {
        YearBucket::Mortgage(month.div_ceil(12))
    }
}
