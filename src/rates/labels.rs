use crate::decimal::Rate;
use crate::types::RateKind;

/// formats the display label of a resolved rate period
pub trait PeriodLabeler {
    fn label(&self, lender_name: &str, kind: RateKind, rate: Rate) -> String;
}

/// "{lender} {term}-Year Fixed @ {rate}%" or "{lender} Variable @ {rate}%"
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLabeler;

impl PeriodLabeler for DefaultLabeler {
    fn label(&self, lender_name: &str, kind: RateKind, rate: Rate) -> String {
        match kind {
            RateKind::Fixed {
                term_years: Some(term),
            } => format!("{lender_name} {term}-Year Fixed @ {rate}"),
            RateKind::Fixed { term_years: None } => format!("{lender_name} Fixed @ {rate}"),
            RateKind::Variable => format!("{lender_name} Variable @ {rate}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_labels() {
        let labeler = DefaultLabeler;
        let rate = Rate::from_percent(dec!(3.45));

        assert_eq!(
            labeler.label("AIB", RateKind::Fixed { term_years: Some(3) }, rate),
            "AIB 3-Year Fixed @ 3.45%"
        );
        assert_eq!(
            labeler.label("AIB", RateKind::Variable, Rate::from_percent(dec!(4.00))),
            "AIB Variable @ 4%"
        );
    }
}
