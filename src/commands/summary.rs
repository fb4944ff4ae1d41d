use crate::commands::{plural, Out};
use crate::{Config, Result, Summary};
use std::fmt::Write;

/// Shows the total spent, the spending per category and the budget breakdown.
pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let tracker = config.tracker().await?;
    let summary = tracker.aggregator().summary();
    let message = render(&summary, config.currency_symbol());
    Ok(Out::new(message, summary))
}

fn render(summary: &Summary, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total spent: {} across {}",
        summary.total_spent().format(symbol),
        plural(summary.transaction_count(), "transaction", "transactions"),
    );
    let _ = writeln!(out, "Total budget: {}", summary.total_budget().format(symbol));

    if !summary.by_category().is_empty() {
        let _ = writeln!(out, "\nSpending by category:");
        for entry in summary.by_category().iter() {
            let _ = writeln!(
                out,
                "  {:<16} {:>14}",
                entry.category().as_str(),
                entry.spent().format(symbol)
            );
        }
    }

    let _ = writeln!(out, "\nBudgets:");
    for category in summary.budget_breakdown() {
        let flag = if category.is_over_budget() {
            "  OVER BUDGET"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {:<16} spent {:>14} of {:>14}, remaining {:>14}{flag}",
            category.name().as_str(),
            category.spent().format(symbol),
            category.budget().format(symbol),
            category.remaining().format(symbol),
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_summary_milk_and_rent() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;
        env.insert_test_transaction("Rent", "1000", "2024-04-02", "Bills")
            .await;

        let out = summary(env.config()).await.unwrap();
        let structure = out.structure().unwrap();
        assert_eq!(structure.total_spent(), Amount::from(1050));
        assert_eq!(structure.by_category().get("Groceries"), Some(Amount::from(50)));
        assert_eq!(structure.by_category().get("Bills"), Some(Amount::from(1000)));
        assert!(out
            .message()
            .starts_with("Total spent: ₹1,050.00 across 2 transactions"));
    }

    #[tokio::test]
    async fn test_summary_flags_over_budget() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Rent", "1000", "2024-04-02", "Bills")
            .await;
        let mut tracker = env.config().tracker().await.unwrap();
        tracker.set_budget("Bills", Amount::from(900)).await.unwrap();

        let out = summary(env.config()).await.unwrap();
        let bills_line = out
            .message()
            .lines()
            .find(|l| l.trim_start().starts_with("Bills") && l.contains("remaining"))
            .unwrap();
        assert!(bills_line.ends_with("OVER BUDGET"), "{bills_line}");
        assert!(bills_line.contains("-₹100.00"));
    }

    #[tokio::test]
    async fn test_summary_empty() {
        let env = TestEnv::new().await;
        let out = summary(env.config()).await.unwrap();
        assert!(out.message().starts_with("Total spent: ₹0.00 across 0 transactions"));
        assert_eq!(out.structure().unwrap().budget_breakdown().len(), 3);
    }
}
