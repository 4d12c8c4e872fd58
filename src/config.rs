use chrono::{Datelike, Months, NaiveDate};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, SimulationError};
use crate::rates::RatePeriodStack;
use crate::types::{
    AllowanceBasis, AllowanceType, BuyerType, ConstructionRepaymentType, OverpaymentEffect,
    OverpaymentFrequency, OverpaymentKind, RateType, TransactionPeriod,
};

/// loan-level terms of the mortgage being simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    pub amount: Money,
    pub term_months: u32,
    pub property_value: Money,
    /// first payment month; None runs the simulation in relative months
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub ber: Option<String>,
    #[serde(default = "default_buyer_type")]
    pub buyer_type: BuyerType,
}

fn default_buyer_type() -> BuyerType {
    BuyerType::FirstTimeBuyer
}

impl MortgageTerms {
    pub fn new(amount: Money, term_months: u32, property_value: Money) -> Self {
        Self {
            amount,
            term_months,
            property_value,
            start_date: None,
            ber: None,
            buyer_type: default_buyer_type(),
        }
    }

    /// anchor the schedule to a calendar start date
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_buyer_type(mut self, buyer_type: BuyerType) -> Self {
        self.buyer_type = buyer_type;
        self
    }

    pub fn with_ber(mut self, ber: impl Into<String>) -> Self {
        self.ber = Some(ber.into());
        self
    }

    /// start on the first day of the month after the provider's current time
    pub fn starting_next_month(mut self, time: &SafeTimeProvider) -> Result<Self> {
        let today = time.now().date_naive();
        let first_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or_else(|| SimulationError::InvalidDate {
                message: format!("cannot take first of month for {today}"),
            })?;
        let next = first_of_month
            .checked_add_months(Months::new(1))
            .ok_or_else(|| SimulationError::InvalidDate {
                message: format!("month after {today} is out of range"),
            })?;
        self.start_date = Some(next);
        Ok(self)
    }

    /// calendar date of a 1-based month, None in relative mode
    pub fn date_for_month(&self, month: u32) -> Option<NaiveDate> {
        let start = self.start_date?;
        start.checked_add_months(Months::new(month.saturating_sub(1)))
    }

    /// loan to value as a percentage, None without a property value
    pub fn ltv_for(&self, balance: Money) -> Option<Decimal> {
        balance
            .ratio_to(self.property_value)
            .map(|r| r * Decimal::ONE_HUNDRED)
    }

    pub fn starting_ltv(&self) -> Option<Decimal> {
        self.ltv_for(self.amount)
    }

    pub fn is_degenerate(&self) -> bool {
        !self.amount.is_positive() || self.term_months == 0
    }
}

/// a scheduled overpayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpaymentConfig {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: OverpaymentKind,
    pub amount: Money,
    pub start_month: u32,
    #[serde(default)]
    pub end_month: Option<u32>,
    #[serde(default = "default_frequency")]
    pub frequency: OverpaymentFrequency,
    pub effect: OverpaymentEffect,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub label: Option<String>,
    /// restrict to months where this rate period is active
    #[serde(default)]
    pub rate_period_id: Option<Uuid>,
}

fn default_frequency() -> OverpaymentFrequency {
    OverpaymentFrequency::Monthly
}

fn default_enabled() -> bool {
    true
}

impl OverpaymentConfig {
    /// single lump sum in the given month
    pub fn one_time(amount: Money, month: u32, effect: OverpaymentEffect) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OverpaymentKind::OneTime,
            amount,
            start_month: month,
            end_month: None,
            frequency: OverpaymentFrequency::Monthly,
            effect,
            enabled: true,
            label: None,
            rate_period_id: None,
        }
    }

    /// repeating overpayment, open-ended when end_month is None
    pub fn recurring(
        amount: Money,
        start_month: u32,
        end_month: Option<u32>,
        frequency: OverpaymentFrequency,
        effect: OverpaymentEffect,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: OverpaymentKind::Recurring,
            amount,
            start_month,
            end_month,
            frequency,
            effect,
            enabled: true,
            label: None,
            rate_period_id: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn for_rate_period(mut self, rate_period_id: Uuid) -> Self {
        self.rate_period_id = Some(rate_period_id);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.kind == OverpaymentKind::Recurring
    }
}

/// lender rules for fee-free overpayments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpaymentPolicy {
    pub id: String,
    pub allowance_type: AllowanceType,
    pub allowance_basis: AllowanceBasis,
    /// percentage figure or flat yearly amount in minor units
    pub allowance_value: Decimal,
    #[serde(default)]
    pub min_amount: Option<Money>,
    #[serde(default)]
    pub max_transactions: Option<u32>,
    #[serde(default)]
    pub max_transactions_period: Option<TransactionPeriod>,
}

impl OverpaymentPolicy {
    /// flat yearly allowance
    pub fn flat(id: impl Into<String>, yearly: Money) -> Self {
        Self {
            id: id.into(),
            allowance_type: AllowanceType::Flat,
            allowance_basis: AllowanceBasis::Balance,
            allowance_value: yearly.as_decimal(),
            min_amount: None,
            max_transactions: None,
            max_transactions_period: None,
        }
    }

    /// yearly percentage of the balance
    pub fn percentage_of_balance(id: impl Into<String>, percent: Decimal) -> Self {
        Self {
            id: id.into(),
            allowance_type: AllowanceType::Percentage,
            allowance_basis: AllowanceBasis::Balance,
            allowance_value: percent,
            min_amount: None,
            max_transactions: None,
            max_transactions_period: None,
        }
    }

    /// monthly percentage of the installment with an optional floor
    pub fn percentage_of_payment(
        id: impl Into<String>,
        percent: Decimal,
        min_amount: Option<Money>,
    ) -> Self {
        Self {
            id: id.into(),
            allowance_type: AllowanceType::Percentage,
            allowance_basis: AllowanceBasis::Monthly,
            allowance_value: percent,
            min_amount,
            max_transactions: None,
            max_transactions_period: None,
        }
    }

    pub fn with_transaction_limit(mut self, max: u32, period: TransactionPeriod) -> Self {
        self.max_transactions = Some(max);
        self.max_transactions_period = Some(period);
        self
    }

    /// true when the allowance is checked per month rather than per year
    pub fn is_monthly_basis(&self) -> bool {
        self.allowance_type == AllowanceType::Percentage
            && self.allowance_basis == AllowanceBasis::Monthly
    }
}

/// one scheduled disbursement of a self-build mortgage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStage {
    pub month: u32,
    pub amount: Money,
    #[serde(default)]
    pub label: Option<String>,
}

impl DrawdownStage {
    pub fn new(month: u32, amount: Money) -> Self {
        Self {
            month,
            amount,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfBuildConfig {
    pub enabled: bool,
    pub drawdown_stages: Vec<DrawdownStage>,
    pub construction_repayment_type: ConstructionRepaymentType,
    #[serde(default)]
    pub interest_only_months: u32,
}

impl SelfBuildConfig {
    pub fn new(
        drawdown_stages: Vec<DrawdownStage>,
        construction_repayment_type: ConstructionRepaymentType,
        interest_only_months: u32,
    ) -> Self {
        Self {
            enabled: true,
            drawdown_stages,
            construction_repayment_type,
            interest_only_months,
        }
    }
}

/// everything the caller controls about one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub terms: MortgageTerms,
    pub rate_periods: RatePeriodStack,
    #[serde(default)]
    pub overpayments: Vec<OverpaymentConfig>,
    #[serde(default)]
    pub self_build: Option<SelfBuildConfig>,
}

impl SimulationState {
    pub fn new(terms: MortgageTerms, rate_periods: RatePeriodStack) -> Self {
        Self {
            terms,
            rate_periods,
            overpayments: Vec::new(),
            self_build: None,
        }
    }

    pub fn with_overpayment(mut self, overpayment: OverpaymentConfig) -> Self {
        self.overpayments.push(overpayment);
        self
    }

    pub fn with_self_build(mut self, self_build: SelfBuildConfig) -> Self {
        self.self_build = Some(self_build);
        self
    }

    /// copy with every overpayment removed
    pub fn without_overpayments(&self) -> Self {
        Self {
            overpayments: Vec::new(),
            ..self.clone()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// reject inputs a form should never submit
    ///
    /// The engine tolerates all of these; this is for callers that want to
    /// surface mistakes before running.
    pub fn validate(&self) -> Result<()> {
        for overpayment in &self.overpayments {
            if overpayment.start_month == 0 {
                return Err(SimulationError::InvalidConfiguration {
                    message: format!("overpayment {} starts in month 0", overpayment.id),
                });
            }
            if overpayment.end_month.is_some_and(|end| end < overpayment.start_month) {
                return Err(SimulationError::InvalidConfiguration {
                    message: format!("overpayment {} ends before it starts", overpayment.id),
                });
            }
        }

        if let Some(self_build) = self.self_build.as_ref().filter(|sb| sb.enabled) {
            if self_build.drawdown_stages.iter().any(|s| s.month == 0) {
                return Err(SimulationError::InvalidConfiguration {
                    message: "drawdown stage scheduled in month 0".to_string(),
                });
            }
            let drawn: Money = self_build.drawdown_stages.iter().map(|s| s.amount).sum();
            if drawn > self.terms.amount {
                return Err(SimulationError::InvalidConfiguration {
                    message: format!(
                        "drawdown stages total {} but the mortgage is {}",
                        drawn, self.terms.amount
                    ),
                });
            }
        }

        Ok(())
    }
}

/// lender catalogue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub overpayment_policy_id: Option<String>,
}

/// published mortgage rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageRate {
    pub id: String,
    pub lender_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rate_type: RateType,
    /// annual percentage, e.g. 3.5
    pub rate: Decimal,
    #[serde(default)]
    pub fixed_term: Option<u32>,
    #[serde(default)]
    pub min_ltv: Decimal,
    #[serde(default = "default_max_ltv")]
    pub max_ltv: Decimal,
    #[serde(default)]
    pub buyer_types: Vec<BuyerType>,
    #[serde(default)]
    pub ber_eligible: Option<Vec<String>>,
    /// false for follow-on rates only offered to existing customers
    #[serde(default = "default_new_business")]
    pub new_business: bool,
}

fn default_max_ltv() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_new_business() -> bool {
    true
}

impl MortgageRate {
    pub fn is_buy_to_let(&self) -> bool {
        self.buyer_types.iter().any(BuyerType::is_buy_to_let)
    }

    pub fn covers_ltv(&self, ltv: Decimal) -> bool {
        ltv >= self.min_ltv && ltv <= self.max_ltv
    }

    /// whether a borrower at this ltv, buyer type and BER may take the rate
    pub fn is_eligible(&self, ltv: Decimal, buyer_type: BuyerType, ber: Option<&str>) -> bool {
        if !self.covers_ltv(ltv) {
            return false;
        }
        if !self.buyer_types.is_empty() && !self.buyer_types.contains(&buyer_type) {
            return false;
        }
        match (&self.ber_eligible, ber) {
            (Some(allowed), Some(ber)) => allowed.iter().any(|b| b.eq_ignore_ascii_case(ber)),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// user-entered rate that is not in the published catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRate {
    pub id: String,
    pub lender_id: String,
    pub lender_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rate_type: RateType,
    pub rate: Decimal,
    #[serde(default)]
    pub fixed_term: Option<u32>,
}

/// read-only catalogues supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub rates: Vec<MortgageRate>,
    #[serde(default)]
    pub custom_rates: Vec<CustomRate>,
    #[serde(default)]
    pub lenders: Vec<Lender>,
    #[serde(default)]
    pub policies: Vec<OverpaymentPolicy>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_rate(mut self, rate: MortgageRate) -> Self {
        self.rates.push(rate);
        self
    }

    pub fn with_custom_rate(mut self, rate: CustomRate) -> Self {
        self.custom_rates.push(rate);
        self
    }

    pub fn with_lender(mut self, lender: Lender) -> Self {
        self.lenders.push(lender);
        self
    }

    pub fn with_policy(mut self, policy: OverpaymentPolicy) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn rate(&self, id: &str, lender_id: &str) -> Option<&MortgageRate> {
        self.rates
            .iter()
            .find(|r| r.id == id && r.lender_id == lender_id)
    }

    pub fn custom_rate(&self, id: &str) -> Option<&CustomRate> {
        self.custom_rates.iter().find(|r| r.id == id)
    }

    pub fn lender(&self, id: &str) -> Option<&Lender> {
        self.lenders.iter().find(|l| l.id == id)
    }

    pub fn policy(&self, id: &str) -> Option<&OverpaymentPolicy> {
        self.policies.iter().find(|p| p.id == id)
    }

    /// published rates available to this borrower
    pub fn eligible_rates(
        &self,
        ltv: Decimal,
        buyer_type: BuyerType,
        ber: Option<&str>,
    ) -> Vec<&MortgageRate> {
        self.rates
            .iter()
            .filter(|r| r.is_eligible(ltv, buyer_type, ber))
            .collect()
    }
}

/// engine tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// self-build interest differences at or below this are reported as none
    pub self_build_noise_threshold: Money,
    /// most scenarios a single comparison will run
    pub max_comparison_scenarios: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            self_build_noise_threshold: Money::from_minor(100),
            max_comparison_scenarios: crate::analysis::MAX_COMPARISON_SCENARIOS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn sample_rate() -> MortgageRate {
        MortgageRate {
            id: "aib-3y".to_string(),
            lender_id: "aib".to_string(),
            name: "3 Year Fixed".to_string(),
            rate_type: RateType::Fixed,
            rate: dec!(3.5),
            fixed_term: Some(3),
            min_ltv: dec!(0),
            max_ltv: dec!(80),
            buyer_types: vec![BuyerType::FirstTimeBuyer, BuyerType::Mover],
            ber_eligible: Some(vec!["A1".to_string(), "A2".to_string()]),
            new_business: true,
        }
    }

    #[test]
    fn test_date_for_month() {
        let terms = MortgageTerms::new(Money::from_minor(100_000), 12, Money::from_minor(200_000))
            .with_start_date(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());

        assert_eq!(terms.date_for_month(1), NaiveDate::from_ymd_opt(2025, 11, 1));
        assert_eq!(terms.date_for_month(3), NaiveDate::from_ymd_opt(2026, 1, 1));
    }

    #[test]
    fn test_relative_mode_has_no_dates() {
        let terms = MortgageTerms::new(Money::from_minor(100_000), 12, Money::from_minor(200_000));
        assert_eq!(terms.date_for_month(5), None);
    }

    #[test]
    fn test_starting_next_month_uses_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 12, 17, 9, 30, 0).unwrap(),
        ));
        let terms = MortgageTerms::new(Money::from_minor(100_000), 12, Money::from_minor(200_000))
            .starting_next_month(&time)
            .unwrap();

        assert_eq!(terms.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn test_starting_ltv() {
        let terms = MortgageTerms::new(Money::from_minor(90_000), 12, Money::from_minor(100_000));
        assert_eq!(terms.starting_ltv(), Some(dec!(90)));

        let no_value = MortgageTerms::new(Money::from_minor(90_000), 12, Money::ZERO);
        assert_eq!(no_value.starting_ltv(), None);
    }

    #[test]
    fn test_rate_eligibility() {
        let rate = sample_rate();

        assert!(rate.is_eligible(dec!(75), BuyerType::Mover, Some("a2")));
        assert!(!rate.is_eligible(dec!(85), BuyerType::Mover, Some("A2")));
        assert!(!rate.is_eligible(dec!(75), BuyerType::BuyToLet, Some("A2")));
        assert!(!rate.is_eligible(dec!(75), BuyerType::Mover, Some("C1")));
        assert!(!rate.is_eligible(dec!(75), BuyerType::Mover, None));
    }

    #[test]
    fn test_catalogue_lookups() {
        let catalogue = Catalogue::new()
            .with_rate(sample_rate())
            .with_lender(Lender {
                id: "aib".to_string(),
                name: "AIB".to_string(),
                overpayment_policy_id: Some("ten-percent".to_string()),
            })
            .with_policy(OverpaymentPolicy::percentage_of_balance("ten-percent", dec!(10)));

        assert!(catalogue.rate("aib-3y", "aib").is_some());
        assert!(catalogue.rate("aib-3y", "boi").is_none());
        assert_eq!(catalogue.lender("aib").unwrap().name, "AIB");
        assert!(catalogue.policy("ten-percent").is_some());
        assert_eq!(catalogue.eligible_rates(dec!(50), BuyerType::Mover, Some("A1")).len(), 1);
    }

    #[test]
    fn test_catalogue_from_json() {
        let json = r#"{
            "rates": [{
                "id": "boi-svr", "lender_id": "boi", "name": "SVR",
                "type": "variable", "rate": 4.15, "new_business": false
            }],
            "lenders": [{ "id": "boi", "name": "Bank of Ireland" }],
            "policies": [{
                "id": "flat", "allowance_type": "flat", "allowance_basis": "balance",
                "allowance_value": 500000, "max_transactions": 2,
                "max_transactions_period": "year"
            }]
        }"#;

        let catalogue = Catalogue::from_json(json).unwrap();
        let rate = catalogue.rate("boi-svr", "boi").unwrap();
        assert_eq!(rate.rate_type, RateType::Variable);
        assert_eq!(rate.max_ltv, dec!(100));
        assert!(!rate.new_business);
        assert_eq!(
            catalogue.policy("flat").unwrap().max_transactions_period,
            Some(TransactionPeriod::Year)
        );
    }

    #[test]
    fn test_validate_state() {
        let terms = MortgageTerms::new(Money::from_minor(100_000), 120, Money::from_minor(200_000));
        let state = SimulationState::new(terms, RatePeriodStack::empty());
        assert!(state.validate().is_ok());

        let backwards = state.clone().with_overpayment(OverpaymentConfig::recurring(
            Money::from_minor(100),
            12,
            Some(6),
            OverpaymentFrequency::Monthly,
            OverpaymentEffect::ReduceTerm,
        ));
        assert!(matches!(
            backwards.validate(),
            Err(SimulationError::InvalidConfiguration { .. })
        ));

        let overdrawn = state.with_self_build(SelfBuildConfig::new(
            vec![DrawdownStage::new(1, Money::from_minor(150_000))],
            ConstructionRepaymentType::InterestOnly,
            0,
        ));
        assert!(overdrawn.validate().is_err());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Catalogue::from_json("{ not json"),
            Err(SimulationError::Serialization(_))
        ));
    }
}
