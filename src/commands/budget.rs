//! Budget command handlers.

use crate::args::BudgetSetArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Amount;
use crate::store::Mutation;
use crate::{CategoryAggregate, Config, Result};
use std::fmt::Write;
use std::str::FromStr;

/// Sets the budget for one category. An unconfigured category changes nothing and is reported as
/// a warning.
pub async fn budget_set(config: Config, args: BudgetSetArgs) -> Result<Out<Amount>> {
    let limit = Amount::from_str(args.amount().trim()).pub_result(ErrorType::Validation)?;
    let mut tracker = config.tracker().await?;

    Ok(match tracker.set_budget(args.category(), limit).await? {
        Mutation::Applied => Out::new(
            format!(
                "The budget for {} is now {}",
                args.category(),
                limit.format(config.currency_symbol())
            ),
            limit,
        ),
        Mutation::Missing => Out::new_warning(format!(
            "'{}' is not a configured category, no budget was set. The categories are: {}",
            args.category(),
            tracker.categories().joined()
        )),
    })
}

/// Shows every configured category with its budget, the amount spent and what remains.
pub async fn budget_show(config: Config) -> Result<Out<Vec<CategoryAggregate>>> {
    let tracker = config.tracker().await?;
    let aggregator = tracker.aggregator();
    let breakdown = aggregator.budget_breakdown();
    let symbol = config.currency_symbol();

    let mut message = String::new();
    let _ = writeln!(
        message,
        "{:<16} {:>14} {:>14} {:>14}",
        "Category", "Budget", "Spent", "Remaining"
    );
    for category in &breakdown {
        let _ = writeln!(
            message,
            "{:<16} {:>14} {:>14} {:>14}",
            category.name().as_str(),
            category.budget().format(symbol),
            category.spent().format(symbol),
            category.remaining().format(symbol),
        );
    }
    let _ = write!(
        message,
        "{:<16} {:>14} {:>14}",
        "Total",
        aggregator.total_budget().format(symbol),
        aggregator.total_spent().format(symbol),
    );
    Ok(Out::new(message, breakdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_budget_set_and_show() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;

        let out = budget_set(env.config(), BudgetSetArgs::new("Groceries", "300"))
            .await
            .unwrap();
        assert_eq!(out.message(), "The budget for Groceries is now ₹300.00");

        let out = budget_show(env.config()).await.unwrap();
        let breakdown = out.structure().unwrap();
        let names: Vec<_> = breakdown.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Bills", "Entertainment"]);
        assert_eq!(breakdown[0].budget(), Amount::from(300));
        assert_eq!(breakdown[0].spent(), Amount::from(50));
        assert_eq!(breakdown[0].remaining(), Amount::from(250));
        assert!(out.message().lines().last().unwrap().starts_with("Total"));
    }

    #[tokio::test]
    async fn test_budget_set_unknown_category() {
        let env = TestEnv::new().await;
        let out = budget_set(env.config(), BudgetSetArgs::new("Travel", "10"))
            .await
            .unwrap();
        assert!(out.is_warning());

        let tracker = env.config().tracker().await.unwrap();
        assert!(tracker.budgets().get("Travel").is_none());
        assert!(tracker.budgets().get_all().iter().all(|b| b.limit().is_zero()));
    }

    #[tokio::test]
    async fn test_budget_set_rejects_bad_amounts() {
        let env = TestEnv::new().await;
        let err = budget_set(env.config(), BudgetSetArgs::new("Bills", "-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<LedgerError>().map(LedgerError::message),
            Some("Budget must be zero or a positive number")
        );

        let err = budget_set(env.config(), BudgetSetArgs::new("Bills", "lots"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error");
    }
}
