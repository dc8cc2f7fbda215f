//! Stateful layer: the conversation store, services over it, and the
//! persistence-aware manager the shell drives.

pub mod manager;
pub mod services;
pub mod store;
pub mod time;

pub use manager::FinanceManager;
pub use store::{ApplyOutcome, FinanceStore, SimulationImpact};
pub use time::{Clock, FixedClock, SystemClock};
