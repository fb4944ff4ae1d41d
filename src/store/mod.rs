//! The stores that own the program's state and the adapter that persists them.
//!
//! - `Ledger` owns the transaction records.
//! - `Budgets` owns the per-category budget limits.
//! - `Persistence` mirrors both into a `KeyValueStore`.

mod budget;
mod kv;
mod ledger;
mod persist;

pub use budget::{BudgetLimit, Budgets};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use ledger::Ledger;
pub use persist::{Persistence, BUDGETS_KEY, TRANSACTIONS_KEY};

use serde::{Deserialize, Serialize};

/// The outcome of a mutation that targets an existing record or key.
///
/// A target that does not exist is not an error: the store is left as it was and `Missing` is
/// returned so that the caller can decide whether to tell anyone.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// The target was found and changed.
    Applied,
    /// The target was not found and nothing changed.
    Missing,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}
