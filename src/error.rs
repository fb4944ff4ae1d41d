//! Error types shared across the crate.
//!
//! Most of the program works with `anyhow::Error` through the `Result` alias. The stores return
//! `LedgerError` so that callers can tell a rejected draft apart from an I/O failure, and the
//! command layer tags failures with an `ErrorType` before they reach `main`.

use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors raised by the ledger and budget stores. None of these change store state.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// A draft or budget value was rejected. The message is meant to be shown to a person as-is.
    #[error("{0}")]
    Validation(String),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            LedgerError::Validation(message) => message,
        }
    }
}

/// Classifies an error at the boundary where it is reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The user supplied something that failed validation.
    Validation,
    /// The thing being acted upon does not exist.
    NotFound,
    /// Reading or writing the data store failed.
    Persistence,
    /// The home directory or its config file is missing or invalid.
    Config,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// Attaches an `ErrorType` to the error of a `Result` so that it shows up in the final message.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(format!("{error_type} error")))
    }
}
