pub mod allowance;
pub mod amortization;
pub mod overpayment;

pub use allowance::{calculate_allowance, AllowanceBucket, AllowanceKey, AllowanceTracker};
pub use amortization::{
    calculate_interest_only_payment, calculate_monthly_payment, remaining_months, split_payment,
    PaymentSplit,
};
pub use overpayment::{
    get_overpayment_for_month, is_applicable, AppliedOverpayment, MonthContext,
    MonthOverpayments, TransactionCounter,
};
