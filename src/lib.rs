#![doc(test(attr(deny(warnings))))]

//! finbar turns free-form command-bar text ("spent 12 on lunch") into
//! structured finance operations over named conversations, and derives
//! budgets, debt schedules, reports, forecasts and a financial profile
//! from them.

pub mod ai;
pub mod categorize;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod finance;
pub mod parser;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("finbar_core tracing initialized.");
    });
}
