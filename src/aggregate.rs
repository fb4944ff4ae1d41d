//! Summaries derived from the ledger and the budgets.
//!
//! Nothing here is stored or cached. Every call recomputes from the current state, and no call can
//! fail: missing data counts as zero.

use crate::model::{Amount, Category};
use crate::store::{Budgets, Ledger};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Computes aggregates over a snapshot of a `Ledger` and `Budgets`.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    ledger: &'a Ledger,
    budgets: &'a Budgets,
}

impl<'a> Aggregator<'a> {
    pub fn new(ledger: &'a Ledger, budgets: &'a Budgets) -> Self {
        Self { ledger, budgets }
    }

    /// The sum of every transaction amount. Zero for an empty ledger.
    pub fn total_spent(&self) -> Amount {
        self.ledger.list().iter().map(|t| t.amount()).sum()
    }

    /// The amount spent per category. Categories without transactions are absent. Categories are
    /// ordered by their first appearance in the ledger.
    pub fn by_category(&self) -> CategoryTotals {
        let mut totals = CategoryTotals::default();
        for transaction in self.ledger.list() {
            totals.add(transaction.category(), transaction.amount());
        }
        totals
    }

    /// Budget against spend for every budgeted category, in configured order, including categories
    /// with no spending.
    pub fn budget_breakdown(&self) -> Vec<CategoryAggregate> {
        let spent = self.by_category();
        self.budgets
            .get_all()
            .iter()
            .map(|budget| CategoryAggregate {
                name: budget.category().clone(),
                budget: budget.limit(),
                spent: spent.get(budget.category().as_str()).unwrap_or_default(),
            })
            .collect()
    }

    /// The sum of every budget limit.
    pub fn total_budget(&self) -> Amount {
        self.budgets.get_all().iter().map(|b| b.limit()).sum()
    }

    /// Everything the summary view shows.
    pub fn summary(&self) -> Summary {
        Summary {
            transaction_count: self.ledger.len(),
            total_spent: self.total_spent(),
            total_budget: self.total_budget(),
            by_category: self.by_category(),
            budget_breakdown: self.budget_breakdown(),
        }
    }
}

/// The amount spent in one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategorySpend {
    category: Category,
    spent: Amount,
}

impl CategorySpend {
    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn spent(&self) -> Amount {
        self.spent
    }
}

/// Spending per category, in the order the categories first appeared.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct CategoryTotals {
    data: Vec<CategorySpend>,
}

impl CategoryTotals {
    fn add(&mut self, category: &Category, amount: Amount) {
        match self.data.iter_mut().find(|c| &c.category == category) {
            Some(entry) => entry.spent = entry.spent + amount,
            None => self.data.push(CategorySpend {
                category: category.clone(),
                spent: amount,
            }),
        }
    }

    /// The amount spent in `category`, or `None` if it has no transactions.
    pub fn get(&self, category: &str) -> Option<Amount> {
        self.data
            .iter()
            .find(|c| c.category.as_str() == category)
            .map(CategorySpend::spent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategorySpend> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Serializes as a JSON object of category to amount, keeping the order.
impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for entry in &self.data {
            map.serialize_entry(&entry.category, &entry.spent)?;
        }
        map.end()
    }
}

/// Budget against actual spend for one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryAggregate {
    name: Category,
    budget: Amount,
    spent: Amount,
}

impl CategoryAggregate {
    pub fn name(&self) -> &Category {
        &self.name
    }

    pub fn budget(&self) -> Amount {
        self.budget
    }

    pub fn spent(&self) -> Amount {
        self.spent
    }

    /// What is left of the budget. Negative when the budget has been exceeded.
    pub fn remaining(&self) -> Amount {
        self.budget - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

/// A bundle of every aggregate.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    transaction_count: usize,
    total_spent: Amount,
    total_budget: Amount,
    by_category: CategoryTotals,
    budget_breakdown: Vec<CategoryAggregate>,
}

impl Summary {
    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn total_spent(&self) -> Amount {
        self.total_spent
    }

    pub fn total_budget(&self) -> Amount {
        self.total_budget
    }

    pub fn by_category(&self) -> &CategoryTotals {
        &self.by_category
    }

    pub fn budget_breakdown(&self) -> &[CategoryAggregate] {
        &self.budget_breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Categories, Draft};
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn state() -> (Ledger, Budgets) {
        let categories = Categories::default();
        (Ledger::new(categories.clone()), Budgets::new(&categories))
    }

    #[test]
    fn test_empty_ledger() {
        let (ledger, budgets) = state();
        let agg = Aggregator::new(&ledger, &budgets);
        assert_eq!(agg.total_spent(), Amount::ZERO);
        assert!(agg.by_category().is_empty());
        let breakdown = agg.budget_breakdown();
        assert_eq!(breakdown.len(), 3);
        assert!(breakdown.iter().all(|c| c.spent().is_zero()));
    }

    #[test]
    fn test_milk_and_rent() {
        let (mut ledger, budgets) = state();
        ledger
            .add(&Draft::new("Milk", "50", "2024-04-01", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("Rent", "1000", "2024-04-02", "Bills"))
            .unwrap();
        let agg = Aggregator::new(&ledger, &budgets);

        assert_eq!(agg.total_spent(), Amount::from(1050));
        let by_category = agg.by_category();
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category.get("Groceries"), Some(Amount::from(50)));
        assert_eq!(by_category.get("Bills"), Some(Amount::from(1000)));
        assert_eq!(by_category.get("Entertainment"), None);
        assert_eq!(
            serde_json::to_string(&by_category).unwrap(),
            r#"{"Groceries":"50","Bills":"1000"}"#
        );
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let (mut ledger, budgets) = state();
        ledger
            .add(&Draft::new("A", "0.1", "2024-04-01", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("B", "0.2", "2024-04-01", "Groceries"))
            .unwrap();
        let agg = Aggregator::new(&ledger, &budgets);
        assert_eq!(agg.total_spent(), amount("0.3"));
        assert_eq!(agg.by_category().get("Groceries"), Some(amount("0.3")));
    }

    #[test]
    fn test_totals_at_the_amount_limit() {
        let (mut ledger, mut budgets) = state();
        let limit = Amount::LIMIT.to_string();
        ledger
            .add(&Draft::new("House", limit.as_str(), "2024-04-01", "Bills"))
            .unwrap();
        ledger
            .add(&Draft::new("Boat", limit.as_str(), "2024-04-02", "Bills"))
            .unwrap();
        budgets.set_budget("Bills", Amount::LIMIT).unwrap();

        let agg = Aggregator::new(&ledger, &budgets);
        assert_eq!(agg.total_spent(), amount("2000000000000000"));
        assert_eq!(agg.by_category().get("Bills"), Some(amount("2000000000000000")));
        let bills = &agg.budget_breakdown()[1];
        assert_eq!(bills.remaining(), amount("-1000000000000000"));
        assert!(bills.is_over_budget());
    }

    #[test]
    fn test_budget_breakdown() {
        let (mut ledger, mut budgets) = state();
        ledger
            .add(&Draft::new("Milk", "50", "2024-04-01", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("Eggs", "30", "2024-04-03", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("Rent", "1000", "2024-04-02", "Bills"))
            .unwrap();
        budgets.set_budget("Groceries", amount("100")).unwrap();
        budgets.set_budget("Bills", amount("900")).unwrap();
        budgets.set_budget("Entertainment", amount("40")).unwrap();

        let agg = Aggregator::new(&ledger, &budgets);
        let breakdown = agg.budget_breakdown();
        let names: Vec<_> = breakdown.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Bills", "Entertainment"]);

        assert_eq!(breakdown[0].spent(), amount("80"));
        assert_eq!(breakdown[0].remaining(), amount("20"));
        assert!(!breakdown[0].is_over_budget());

        assert_eq!(breakdown[1].budget(), amount("900"));
        assert!(breakdown[1].is_over_budget());
        assert_eq!(breakdown[1].remaining(), amount("-100"));

        assert_eq!(breakdown[2].spent(), Amount::ZERO);
        assert_eq!(agg.total_budget(), amount("1040"));
    }

    #[test]
    fn test_by_category_follows_first_appearance() {
        let (mut ledger, budgets) = state();
        ledger
            .add(&Draft::new("Movie", "12", "2024-04-01", "Entertainment"))
            .unwrap();
        ledger
            .add(&Draft::new("Milk", "5", "2024-04-01", "Groceries"))
            .unwrap();
        ledger
            .add(&Draft::new("Popcorn", "3", "2024-04-01", "Entertainment"))
            .unwrap();
        let agg = Aggregator::new(&ledger, &budgets);
        let order: Vec<_> = agg
            .by_category()
            .iter()
            .map(|c| c.category().to_string())
            .collect();
        assert_eq!(order, vec!["Entertainment", "Groceries"]);
        assert_eq!(agg.by_category().get("Entertainment"), Some(amount("15")));
    }

    #[test]
    fn test_remove_only_transaction() {
        let (mut ledger, budgets) = state();
        let id = ledger
            .add(&Draft::new("Milk", "50", "2024-04-01", "Groceries"))
            .unwrap()
            .id();
        ledger.remove(id);
        let agg = Aggregator::new(&ledger, &budgets);
        assert!(ledger.list().is_empty());
        assert_eq!(agg.total_spent(), Amount::ZERO);
    }

    #[test]
    fn test_summary() {
        let (mut ledger, budgets) = state();
        ledger
            .add(&Draft::new("Milk", "50", "2024-04-01", "Groceries"))
            .unwrap();
        let summary = Aggregator::new(&ledger, &budgets).summary();
        assert_eq!(summary.transaction_count(), 1);
        assert_eq!(summary.total_spent(), Amount::from(50));
        assert_eq!(summary.total_budget(), Amount::ZERO);
        assert_eq!(summary.by_category().len(), 1);
        assert_eq!(summary.budget_breakdown().len(), 3);
    }
}
