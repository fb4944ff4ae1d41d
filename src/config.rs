//! Configuration file handling for spendbook.
//!
//! The configuration file is stored at `$SPENDBOOK_HOME/config.json` and holds the category set,
//! the currency symbol used for display and backup settings. The stored data lives in
//! `$SPENDBOOK_HOME/data` and backups in `$SPENDBOOK_HOME/.backups`.

use crate::backup::Backup;
use crate::model::Categories;
use crate::store::{FileStore, Persistence};
use crate::tracker::Tracker;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_NAME: &str = "spendbook";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DATA: &str = "data";
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDBOOK_HOME` and from there it loads `$SPENDBOOK_HOME/config.json`. It
/// provides paths to the other items that are expected in a certain location within the home
/// directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    data: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its subdirectories and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/spendbook`
    /// - `categories` - The fixed set of categories. Defaults to Groceries, Bills, Entertainment.
    /// - `currency_symbol` - The symbol shown in front of amounts. Defaults to `₹`.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a config file.
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        categories: Option<Categories>,
        currency_symbol: Option<String>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendbook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;
        let data = root.join(DATA);
        utils::make_dir(&data).await?;

        let categories = categories.unwrap_or_default();
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            categories,
            currency_symbol: currency_symbol
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            backup_copies: BACKUP_COPIES,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            backups,
            data,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the data and backups directories exist
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The spendbook home directory is missing, run 'spendbook init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            data: root.join(DATA),
            config_path,
            config_file,
        };
        if !config.data.is_dir() {
            bail!("The data directory is missing '{}'", config.data.display())
        }
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn categories(&self) -> &Categories {
        &self.config_file.categories
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// The persistence adapter over the files in the data directory.
    pub fn persistence(&self) -> Persistence {
        Persistence::new(Arc::new(FileStore::new(&self.data))).with_backup(self.backup())
    }

    /// Opens a tracking session over the stored data.
    pub async fn tracker(&self) -> Result<Tracker> {
        Tracker::open(self.persistence(), self.categories()).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendbook",
///   "config_version": 1,
///   "categories": ["Groceries", "Bills", "Entertainment"],
///   "currency_symbol": "₹",
///   "backup_copies": 5
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendbook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The fixed set of categories, in display order
    #[serde(default)]
    categories: Categories,

    /// Shown in front of amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,

    /// Number of backup copies to keep
    backup_copies: u32,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            categories: Categories::default(),
            currency_symbol: default_currency_symbol(),
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Failed to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file. Is a newer version of spendbook \
            available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
