//! The ledger: the ordered list of transaction records.

use crate::error::{LedgerError, LedgerResult};
use crate::model::{Categories, Draft, Transaction, TransactionId};
use crate::store::Mutation;
use crate::Result;
use anyhow::bail;
use std::collections::HashSet;
use tracing::trace;

const IDS_EXHAUSTED: &str = "No more transaction ids are available";

/// Holds the transaction records in insertion order and hands out their ids.
///
/// Every record in the ledger has a unique id and a positive amount.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ledger {
    categories: Categories,
    data: Vec<Transaction>,
}

impl Ledger {
    /// Creates an empty ledger that accepts transactions in `categories`.
    pub fn new(categories: Categories) -> Self {
        Self {
            categories,
            data: Vec::new(),
        }
    }

    /// Creates a ledger from previously stored records, keeping their order.
    ///
    /// # Errors
    /// - Returns an error if two records share an id or a record's amount is not positive.
    pub fn from_records(categories: Categories, records: Vec<Transaction>) -> Result<Self> {
        let mut ids = HashSet::new();
        for record in &records {
            if record.id() == 0 {
                bail!("Transaction ids must be greater than zero");
            }
            if !ids.insert(record.id()) {
                bail!("The transaction id {} is used more than once", record.id());
            }
            if !record.amount().is_within_limit() {
                bail!(
                    "Transaction {} has an amount that is too large: {}",
                    record.id(),
                    record.amount()
                );
            }
            if !record.amount().is_positive() {
                bail!(
                    "Transaction {} has an amount that is not positive: {}",
                    record.id(),
                    record.amount()
                );
            }
        }
        Ok(Self {
            categories,
            data: records,
        })
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// The records in insertion order.
    pub fn list(&self) -> &[Transaction] {
        &self.data
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.data.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Validates `draft` and appends it with the next id, which is one more than the largest id in
    /// the ledger, or 1 for an empty ledger.
    pub fn add(&mut self, draft: &Draft) -> LedgerResult<&Transaction> {
        let fields = draft.validate(&self.categories)?;
        let id = self
            .next_id()
            .ok_or_else(|| LedgerError::validation(IDS_EXHAUSTED))?;
        trace!("adding transaction {id}");
        self.data.push(Transaction::new(id, fields));
        Ok(&self.data[self.data.len() - 1])
    }

    /// Validates `draft` and overwrites the record with `id`, keeping its id and position.
    ///
    /// An unknown `id` leaves the ledger untouched and returns `Mutation::Missing`. The draft is
    /// validated first, so an invalid draft is an error even when the id is unknown.
    pub fn update(&mut self, id: TransactionId, draft: &Draft) -> LedgerResult<Mutation> {
        let fields = draft.validate(&self.categories)?;
        match self.data.iter_mut().find(|t| t.id() == id) {
            Some(record) => {
                trace!("updating transaction {id}");
                record.overwrite(fields);
                Ok(Mutation::Applied)
            }
            None => Ok(Mutation::Missing),
        }
    }

    /// Removes the record with `id`, returning `Mutation::Missing` if there is none.
    pub fn remove(&mut self, id: TransactionId) -> Mutation {
        let before = self.data.len();
        self.data.retain(|t| t.id() != id);
        if self.data.len() < before {
            trace!("removed transaction {id}");
            Mutation::Applied
        } else {
            Mutation::Missing
        }
    }

    /// `None` once the largest id is `TransactionId::MAX`.
    fn next_id(&self) -> Option<TransactionId> {
        self.data
            .iter()
            .map(Transaction::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }
}
