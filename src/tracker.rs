//! A tracking session: the two stores plus the persistence that mirrors them.

use crate::aggregate::Aggregator;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Categories, Draft, Transaction, TransactionId};
use crate::store::{Budgets, Ledger, Mutation, Persistence};
use crate::Result;
use tracing::debug;

/// Owns a `Ledger` and `Budgets` and writes both to storage after every mutation that changes
/// something.
///
/// Validation failures surface as errors that downcast to `LedgerError` and leave the state
/// unchanged. If a save fails, the in-memory change is kept and the error is returned.
pub struct Tracker {
    ledger: Ledger,
    budgets: Budgets,
    persistence: Persistence,
}

impl Tracker {
    /// Loads the stored state for `categories` from `persistence`.
    pub async fn open(persistence: Persistence, categories: &Categories) -> Result<Self> {
        let (ledger, budgets) = persistence
            .load(categories)
            .await
            .pub_result(ErrorType::Persistence)?;
        debug!("Opened a ledger with {} transactions", ledger.len());
        Ok(Self {
            ledger,
            budgets,
            persistence,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn budgets(&self) -> &Budgets {
        &self.budgets
    }

    pub fn categories(&self) -> &Categories {
        self.ledger.categories()
    }

    /// The records in insertion order.
    pub fn list(&self) -> &[Transaction] {
        self.ledger.list()
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.ledger, &self.budgets)
    }

    /// Adds a transaction and saves. Returns the stored record.
    pub async fn add(&mut self, draft: &Draft) -> Result<Transaction> {
        let transaction = self
            .ledger
            .add(draft)
            .pub_result(ErrorType::Validation)?
            .clone();
        self.save().await?;
        Ok(transaction)
    }

    /// Overwrites a transaction and saves if it exists.
    pub async fn update(&mut self, id: TransactionId, draft: &Draft) -> Result<Mutation> {
        let mutation = self
            .ledger
            .update(id, draft)
            .pub_result(ErrorType::Validation)?;
        self.save_if(mutation).await
    }

    /// Removes a transaction and saves if it existed.
    pub async fn remove(&mut self, id: TransactionId) -> Result<Mutation> {
        let mutation = self.ledger.remove(id);
        self.save_if(mutation).await
    }

    /// Sets a category budget and saves if the category exists.
    pub async fn set_budget(&mut self, category: &str, limit: Amount) -> Result<Mutation> {
        let mutation = self
            .budgets
            .set_budget(category, limit)
            .pub_result(ErrorType::Validation)?;
        self.save_if(mutation).await
    }

    async fn save_if(&self, mutation: Mutation) -> Result<Mutation> {
        if mutation.is_applied() {
            self.save().await?;
        }
        Ok(mutation)
    }

    async fn save(&self) -> Result<()> {
        self.persistence
            .save(&self.ledger, &self.budgets)
            .await
            .pub_result(ErrorType::Persistence)
    }
}
