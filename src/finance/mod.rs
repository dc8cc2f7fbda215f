//! Pure calculators over conversation data.

pub mod debt;
pub mod forecast;
pub mod profile;
pub mod report;
pub mod rules;

pub use debt::{edit_installment, monthly_obligation, record_payment, schedule};
pub use forecast::{goal_eta, month_end_forecast, Forecast};
pub use profile::{financial_profile, FinancialProfile, ProfileTier};
pub use report::{monthly_report, narrate, CategoryLine, LineStatus, MonthlyReport};
pub use rules::{allocate, compare, BucketAllocation, BucketStatus, RuleAllocation, SubAllocation};
