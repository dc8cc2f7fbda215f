pub mod budget;
pub mod common;
pub mod conversation;
pub mod debt;
pub mod goal;
pub mod recurring;
pub mod rule;
pub mod transaction;

pub use budget::{Budget, BudgetPeriod};
pub use common::{round_cents, shift_month, MonthKey};
pub use conversation::{Conversation, CURRENT_SCHEMA_VERSION};
pub use debt::{Debt, DebtDirection, Installment};
pub use goal::{Contribution, Goal};
pub use recurring::{Frequency, RecurringCharge};
pub use rule::{Bucket, BudgetRule};
pub use transaction::{EntryKind, Transaction};
