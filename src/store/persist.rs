//! The persistence adapter: mirrors the ledger and the budgets into a `KeyValueStore`.

use crate::backup::Backup;
use crate::model::{Amount, Categories, Transaction};
use crate::store::{Budgets, KeyValueStore, Ledger};
use crate::Result;
use anyhow::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The key under which the transaction list is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// The key under which the budget map is stored.
pub const BUDGETS_KEY: &str = "budgets";

/// Loads and saves the two blobs. The blobs are written independently; there is no atomicity
/// between them.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
    backup: Option<Backup>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            backup: None,
        }
    }

    /// Copies blobs that fail to load into `backup` before they are discarded.
    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Reads both blobs. A missing blob gives the empty default. So does a malformed one, after it
    /// has been logged and copied to the backups.
    ///
    /// # Errors
    /// - Returns an error if the underlying store cannot be read.
    pub async fn load(&self, categories: &Categories) -> Result<(Ledger, Budgets)> {
        let ledger = match self.store.get(TRANSACTIONS_KEY).await? {
            None => {
                debug!("No stored transactions, starting with an empty ledger");
                Ledger::new(categories.clone())
            }
            Some(content) => match parse_ledger(categories, &content) {
                Ok(ledger) => ledger,
                Err(e) => {
                    self.discard(TRANSACTIONS_KEY, &content, e).await;
                    Ledger::new(categories.clone())
                }
            },
        };

        let budgets = match self.store.get(BUDGETS_KEY).await? {
            None => {
                debug!("No stored budgets, starting with zero budgets");
                Budgets::new(categories)
            }
            Some(content) => match parse_budgets(categories, &content) {
                Ok(budgets) => budgets,
                Err(e) => {
                    self.discard(BUDGETS_KEY, &content, e).await;
                    Budgets::new(categories)
                }
            },
        };

        Ok((ledger, budgets))
    }

    /// Writes both blobs.
    pub async fn save(&self, ledger: &Ledger, budgets: &Budgets) -> Result<()> {
        let transactions = serde_json::to_string_pretty(ledger.list())
            .context("Unable to serialize transactions")?;
        self.store.set(TRANSACTIONS_KEY, transactions).await?;

        let budgets = serde_json::to_string_pretty(budgets).context("Unable to serialize budgets")?;
        self.store.set(BUDGETS_KEY, budgets).await?;
        debug!("Saved {} transactions and budgets", ledger.len());
        Ok(())
    }

    /// Logs a blob that could not be loaded and keeps a copy of it, if backups are configured.
    async fn discard(&self, key: &str, content: &str, error: anyhow::Error) {
        warn!("The stored '{key}' data is malformed and will be ignored: {error:#}");
        if let Some(backup) = &self.backup {
            match backup.save_blob(key, content).await {
                Ok(path) => warn!("A copy of the malformed data was saved to {}", path.display()),
                Err(e) => warn!("Unable to back up the malformed '{key}' data: {e:#}"),
            }
        }
    }
}

fn parse_ledger(categories: &Categories, content: &str) -> Result<Ledger> {
    let records: Vec<Transaction> =
        serde_json::from_str(content).context("Unable to parse the transaction list")?;
    for record in &records {
        if !categories.contains(record.category().as_str()) {
            warn!(
                "Transaction {} uses the category '{}' which is not configured",
                record.id(),
                record.category()
            );
        }
    }
    Ledger::from_records(categories.clone(), records)
}

/// A cleared budget input is stored as `""` and reads back as zero.
fn parse_budgets(categories: &Categories, content: &str) -> Result<Budgets> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(content).context("Unable to parse the budget map")?;
    let mut stored = BTreeMap::new();
    for (name, value) in raw {
        let limit = match value {
            Value::String(s) if s.trim().is_empty() => Amount::ZERO,
            other => serde_json::from_value(other)
                .with_context(|| format!("Unable to parse the budget for '{name}'"))?,
        };
        stored.insert(name, limit);
    }
    Ok(Budgets::from_stored(categories, stored)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Draft;
    use crate::store::MemoryStore;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn seeded(transactions: Option<&str>, budgets: Option<&str>) -> Arc<MemoryStore> {
        let mut data = HashMap::new();
        if let Some(t) = transactions {
            data.insert(TRANSACTIONS_KEY.to_string(), t.to_string());
        }
        if let Some(b) = budgets {
            data.insert(BUDGETS_KEY.to_string(), b.to_string());
        }
        Arc::new(MemoryStore::with_data(data))
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));
        let categories = Categories::default();
        let (ledger, budgets) = persistence.load(&categories).await.unwrap();
        assert!(ledger.is_empty());
        assert_eq!(budgets, Budgets::new(&categories));
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let categories = Categories::default();
        let persistence = Persistence::new(Arc::new(MemoryStore::new()));

        let mut ledger = Ledger::new(categories.clone());
        ledger
            .add(&Draft::new("Milk", "50.10", "2024-04-01", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("Rent", "1000", "2024-04-02", "Bills"))
            .unwrap();
        ledger
            .add(&Draft::new("Cinema", "0.005", "2024-04-03", "Entertainment"))
            .unwrap();
        ledger.remove(1);
        let mut budgets = Budgets::new(&categories);
        budgets.set_budget("Bills", "1200.50".parse().unwrap()).unwrap();

        persistence.save(&ledger, &budgets).await.unwrap();
        let (loaded_ledger, loaded_budgets) = persistence.load(&categories).await.unwrap();

        assert_eq!(loaded_ledger, ledger);
        assert_eq!(loaded_budgets, budgets);
        assert_eq!(loaded_ledger.list()[1].amount().to_string(), "0.005");
    }

    #[tokio::test]
    async fn test_load_blob_written_by_a_browser() {
        let transactions = r#"[
            {"amount":"50","description":"Milk","date":"2024-04-01","category":"Groceries","id":1},
            {"amount":"1000","description":"Rent","date":"2024-04-02","category":"Bills","id":2}
        ]"#;
        let budgets = r#"{"Groceries":"300","Bills":0,"Entertainment":12.5}"#;
        let persistence = Persistence::new(seeded(Some(transactions), Some(budgets)));
        let (ledger, budgets) = persistence.load(&Categories::default()).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.list()[1].description(), "Rent");
        assert_eq!(budgets.get("Groceries"), Some(Amount::from(300)));
        assert_eq!(budgets.get("Entertainment"), Some("12.5".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_load_malformed_transactions_falls_back_and_backs_up() {
        let dir = TempDir::new().unwrap();
        let persistence = Persistence::new(seeded(Some("[{not json"), Some(r#"{"Bills":"7"}"#)))
            .with_backup(Backup::with_dir(dir.path(), 5));

        let (ledger, budgets) = persistence.load(&Categories::default()).await.unwrap();
        assert!(ledger.is_empty());
        assert_eq!(budgets.get("Bills"), Some(Amount::from(7)));

        let mut entries = crate::utils::read_dir(dir.path()).await.unwrap();
        let entry = entries.next_entry().await.unwrap().unwrap();
        let name = entry.file_name().to_string_lossy().to_string();
        assert!(name.starts_with("transactions."), "{name}");
        assert_eq!(crate::utils::read(&entry.path()).await.unwrap(), "[{not json");
    }

    #[tokio::test]
    async fn test_load_duplicate_ids_is_malformed() {
        let transactions = r#"[
            {"id":1,"description":"Milk","amount":"50","date":"2024-04-01","category":"Groceries"},
            {"id":1,"description":"Rent","amount":"9","date":"2024-04-02","category":"Bills"}
        ]"#;
        let persistence = Persistence::new(seeded(Some(transactions), None));
        let (ledger, _) = persistence.load(&Categories::default()).await.unwrap();
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_load_cleared_budget_is_zero() {
        let budgets = r#"{"Groceries":"","Bills":"450","Entertainment":" "}"#;
        let persistence = Persistence::new(seeded(None, Some(budgets)));
        let (_, budgets) = persistence.load(&Categories::default()).await.unwrap();
        assert_eq!(budgets.get("Groceries"), Some(Amount::ZERO));
        assert_eq!(budgets.get("Bills"), Some(Amount::from(450)));
        assert_eq!(budgets.get("Entertainment"), Some(Amount::ZERO));
    }

    #[tokio::test]
    async fn test_load_malformed_budgets_falls_back() {
        let persistence = Persistence::new(seeded(None, Some(r#"{"Bills":"-4"}"#)));
        let categories = Categories::default();
        let (_, budgets) = persistence.load(&categories).await.unwrap();
        assert_eq!(budgets, Budgets::new(&categories));
    }

    #[tokio::test]
    async fn test_save_writes_both_keys() {
        let store = Arc::new(MemoryStore::new());
        let persistence = Persistence::new(store.clone());
        let categories = Categories::default();
        persistence
            .save(&Ledger::new(categories.clone()), &Budgets::new(&categories))
            .await
            .unwrap();
        let transactions = store.get(TRANSACTIONS_KEY).await.unwrap().unwrap();
        assert_eq!(transactions, "[]");
        let budgets = store.get(BUDGETS_KEY).await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&budgets).unwrap();
        assert_eq!(parsed["Bills"], "0");
    }
}
