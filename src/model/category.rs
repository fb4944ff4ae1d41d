use crate::Result;
use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// The categories a fresh home is configured with.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Groceries", "Bills", "Entertainment"];

/// The name of a spending category, e.g. `Groceries`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::new(value)
    }
}

/// The fixed, ordered set of categories that transactions may use and that budgets are kept for.
///
/// The set is decided when the stores are constructed and never changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Categories(Vec<Category>);

impl Categories {
    /// Builds a category set. Names are trimmed; blank names and duplicates are rejected.
    pub fn new<S>(names: impl IntoIterator<Item = S>) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut data = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                bail!("Category names cannot be blank");
            }
            if !seen.insert(name.to_string()) {
                bail!("The category '{name}' is listed more than once");
            }
            data.push(Category::new(name));
        }
        ensure!(!data.is_empty(), "At least one category is required");
        Ok(Self(data))
    }

    /// Finds the configured category with exactly this name.
    pub fn find(&self, name: &str) -> Option<&Category> {
        self.0.iter().find(|c| c.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// The names joined for use in messages, e.g. `Groceries, Bills, Entertainment`.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self(DEFAULT_CATEGORIES.iter().map(|&s| Category::new(s)).collect())
    }
}

impl Deref for Categories {
    type Target = [Category];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        Categories::new(names).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categories() {
        let categories = Categories::default();
        assert_eq!(categories.joined(), "Groceries, Bills, Entertainment");
        assert!(categories.contains("Bills"));
        assert!(!categories.contains("bills"));
    }

    #[test]
    fn test_new_trims_and_keeps_order() {
        let categories = Categories::new([" Rent ", "Food"]).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].as_str(), "Rent");
        assert_eq!(categories[1].as_str(), "Food");
    }

    #[test]
    fn test_new_rejects_bad_sets() {
        assert!(Categories::new(Vec::<&str>::new()).is_err());
        assert!(Categories::new(["Food", "  "]).is_err());
        let err = Categories::new(["Food", "Food"]).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_deserialize_validates() {
        let categories: Categories = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        assert_eq!(categories.joined(), "A, B");
        assert!(serde_json::from_str::<Categories>(r#"["A", "A"]"#).is_err());
    }
}
