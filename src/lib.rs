#![doc(test(attr(deny(warnings))))]

//! Bordero Core keeps an event's box-office statement: revenue lines, profit
//! shares and closing expenses, with an edit session that recomputes derived
//! totals and exports printable reports.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ingest;
pub mod ledger;
pub mod report;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bordero Core tracing initialized.");
    });
}
