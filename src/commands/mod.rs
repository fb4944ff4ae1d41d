//! Command handlers for the spendbook CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod budget;
mod delete;
mod init;
mod list;
mod summary;
mod update;

use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info, warn};

pub use add::add;
pub use budget::{budget_set, budget_show};
pub use delete::delete;
pub use init::init;
pub use list::list;
pub use summary::summary;
pub use update::update;

/// Loads the configuration from `home`, tagging any failure as a config error.
pub async fn load_config(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
}

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// True when the command did nothing because its target does not exist.
    #[serde(skip)]
    warning: bool,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            warning: false,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            warning: false,
        }
    }

    /// Create a new `Out` object for a command that changed nothing.
    pub fn new_warning<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            warning: true,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    pub fn is_warning(&self) -> bool {
        self.warning
    }

    /// Print the message to `info!` (or `warn!`) and the structured data (if it exists) as JSON to
    /// `debug!`.
    pub fn print(&self) {
        if self.warning {
            warn!("{}", self.message);
        } else {
            info!("{}", self.message);
        }
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}
