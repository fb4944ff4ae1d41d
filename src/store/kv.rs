//! The durable key-value store that the persistence adapter writes named blobs into.
//!
//! `FileStore` keeps one JSON file per key in a directory. `MemoryStore` keeps everything in a map
//! and is what the tests use, but it is compiled into the program too so that the stores can be
//! driven without touching the filesystem.

use crate::{utils, Result};
use anyhow::{ensure, Context};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;

/// A store of text blobs addressed by name.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing has been stored there.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Stores each key as `{dir}/{key}.json`.
///
/// Writers of the same key are serialized by a per-key lock, and each write goes to a temporary
/// file that is then renamed over the old one, so readers never see a partial blob.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Creates a store over `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of the file that holds `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("nothing stored at {}", path.display());
                Ok(None)
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read the stored '{key}' data"))
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        check_key(key)?;
        let lock = self.lock_for(key).await;
        let _guard = lock.lock().await;

        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        utils::write(&tmp, value).await?;
        utils::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to store the '{key}' data"))?;
        trace!("wrote {}", path.display());
        Ok(())
    }
}

/// Holds blobs in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `data`. The map key is the blob name.
    pub fn with_data(data: HashMap<String, String>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.data.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Keys become file names, so only plain names are allowed.
fn check_key(key: &str) -> Result<()> {
    ensure!(
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        "Invalid store key '{key}'"
    );
    Ok(())
}
