//! The budget store: one spending limit per configured category.

use crate::error::{LedgerError, LedgerResult};
use crate::model::{Amount, Categories, Category, AMOUNT_TOO_LARGE};
use crate::store::Mutation;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{trace, warn};

pub(crate) const BUDGET_NEGATIVE: &str = "Budget must be zero or a positive number";

/// A budget limit for one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BudgetLimit {
    category: Category,
    limit: Amount,
}

impl BudgetLimit {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn limit(&self) -> Amount {
        self.limit
    }
}

/// Holds a limit for every configured category, in configured order.
///
/// The key set is fixed when the store is created: every category starts at zero and categories
/// are never added or removed afterwards.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Budgets {
    data: Vec<BudgetLimit>,
}

impl Budgets {
    /// Creates a budget of zero for every category.
    pub fn new(categories: &Categories) -> Self {
        Self {
            data: categories
                .iter()
                .map(|category| BudgetLimit {
                    category: category.clone(),
                    limit: Amount::ZERO,
                })
                .collect(),
        }
    }

    /// Creates a budget store from stored values. Values for categories that are not configured are
    /// dropped; configured categories without a stored value stay at zero.
    pub(crate) fn from_stored(
        categories: &Categories,
        stored: BTreeMap<String, Amount>,
    ) -> LedgerResult<Self> {
        let mut budgets = Self::new(categories);
        for (name, limit) in stored {
            if budgets.set_budget(&name, limit)? == Mutation::Missing {
                warn!("Ignoring a stored budget for the unknown category '{name}'");
            }
        }
        Ok(budgets)
    }

    /// Overwrites the limit for `category`. An unknown category is ignored and reported as
    /// `Mutation::Missing`.
    pub fn set_budget(&mut self, category: &str, limit: Amount) -> LedgerResult<Mutation> {
        if limit.is_negative() {
            return Err(LedgerError::validation(BUDGET_NEGATIVE));
        }
        if !limit.is_within_limit() {
            return Err(LedgerError::validation(AMOUNT_TOO_LARGE));
        }
        match self.data.iter_mut().find(|b| b.category.as_str() == category) {
            Some(budget) => {
                trace!("setting the {category} budget to {limit}");
                budget.limit = limit;
                Ok(Mutation::Applied)
            }
            None => Ok(Mutation::Missing),
        }
    }

    /// The limit for `category`, if it is configured.
    pub fn get(&self, category: &str) -> Option<Amount> {
        self.data
            .iter()
            .find(|b| b.category.as_str() == category)
            .map(BudgetLimit::limit)
    }

    /// Every category and its limit in configured order.
    pub fn get_all(&self) -> &[BudgetLimit] {
        &self.data
    }
}

/// Serializes as a JSON object of category to limit, keeping the configured order.
impl Serialize for Budgets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for budget in &self.data {
            map.serialize_entry(&budget.category, &budget.limit)?;
        }
        map.end()
    }
}
