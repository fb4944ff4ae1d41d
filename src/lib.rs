//! spendbook: a personal expense tracker.
//!
//! The `Tracker` owns a `Ledger` of transactions and the per-category `Budgets`, mirrors both into
//! a `KeyValueStore` after every change, and hands out an `Aggregator` for totals.

mod aggregate;
pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod store;
mod tracker;
mod utils;


pub use aggregate::{Aggregator, CategoryAggregate, CategorySpend, CategoryTotals, Summary};
pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, IntoResult, LedgerError, LedgerResult, Result};
pub use tracker::Tracker;
