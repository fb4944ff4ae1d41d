use crate::error::LedgerError;
use crate::model::{Amount, Categories, Category, AMOUNT_TOO_LARGE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The identifier of a transaction. Always greater than zero.
pub type TransactionId = u64;

/// The date format used on input and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const FILL_ALL_FIELDS: &str = "Please fill all fields";
pub(crate) const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
pub(crate) const DATE_INVALID: &str = "Date must be a valid calendar date (YYYY-MM-DD)";

/// A single expense record in the ledger.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    id: TransactionId,
    description: String,
    amount: Amount,
    date: NaiveDate,
    category: Category,
}

impl Transaction {
    pub(crate) fn new(id: TransactionId, fields: Fields) -> Self {
        Self {
            id,
            description: fields.description,
            amount: fields.amount,
            date: fields.date,
            category: fields.category,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Overwrites every field except the id.
    pub(crate) fn overwrite(&mut self, fields: Fields) {
        self.description = fields.description;
        self.amount = fields.amount;
        self.date = fields.date;
        self.category = fields.category;
    }
}

/// The raw values a person typed in for a transaction, before validation and id assignment.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Draft {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: String,
}

impl Draft {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            date: date.into(),
            category: category.into(),
        }
    }

    /// A draft pre-filled with the values of an existing record, as when editing it.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            date: transaction.date.format(DATE_FORMAT).to_string(),
            category: transaction.category.to_string(),
        }
    }

    /// Checks the draft against `categories`. Only the first failing rule is reported.
    pub(crate) fn validate(&self, categories: &Categories) -> Result<Fields, LedgerError> {
        let description = self.description.trim();
        let amount = self.amount.trim();
        let date = self.date.trim();
        let category = self.category.trim();

        if description.is_empty() || amount.is_empty() || date.is_empty() || category.is_empty() {
            return Err(LedgerError::validation(FILL_ALL_FIELDS));
        }

        let amount = match Amount::from_str(amount) {
            Ok(a) if a.is_positive() => a,
            _ => return Err(LedgerError::validation(AMOUNT_NOT_POSITIVE)),
        };
        if !amount.is_within_limit() {
            return Err(LedgerError::validation(AMOUNT_TOO_LARGE));
        }

        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| LedgerError::validation(DATE_INVALID))?;

        let category = categories.find(category).cloned().ok_or_else(|| {
            LedgerError::validation(format!(
                "Category must be one of: {}",
                categories.joined()
            ))
        })?;

        Ok(Fields {
            description: description.to_string(),
            amount,
            date,
            category,
        })
    }
}

/// The validated contents of a `Draft`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Fields {
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) date: NaiveDate,
    pub(crate) category: Category,
}
