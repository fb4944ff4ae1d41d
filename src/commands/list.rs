use crate::commands::{plural, Out};
use crate::model::{Transaction, DATE_FORMAT};
use crate::{Config, Result};
use std::fmt::Write;

/// Lists every transaction in insertion order as a text table.
pub async fn list(config: Config) -> Result<Out<Vec<Transaction>>> {
    let tracker = config.tracker().await?;
    let transactions = tracker.list().to_vec();
    if transactions.is_empty() {
        return Ok(Out::new("No transactions recorded yet", transactions));
    }
    let message = render(&transactions, config.currency_symbol());
    Ok(Out::new(message, transactions))
}

fn render(transactions: &[Transaction], symbol: &str) -> String {
    let amounts: Vec<String> = transactions
        .iter()
        .map(|t| t.amount().format(symbol))
        .collect();
    let description_width = column_width("Description", transactions.iter().map(|t| t.description()));
    let category_width = column_width("Category", transactions.iter().map(|t| t.category().as_str()));
    let amount_width = column_width("Amount", amounts.iter().map(String::as_str));

    let mut out = plural(transactions.len(), "transaction", "transactions");
    out.push('\n');
    let _ = writeln!(
        out,
        "{:>5}  {:<10}  {:<description_width$}  {:<category_width$}  {:>amount_width$}",
        "ID", "Date", "Description", "Category", "Amount",
    );
    for (transaction, amount) in transactions.iter().zip(&amounts) {
        let _ = writeln!(
            out,
            "{:>5}  {:<10}  {:<description_width$}  {:<category_width$}  {:>amount_width$}",
            transaction.id(),
            transaction.date().format(DATE_FORMAT).to_string(),
            transaction.description(),
            transaction.category().as_str(),
            amount,
        );
    }
    out.trim_end().to_string()
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list(env.config()).await.unwrap();
        assert_eq!(out.message(), "No transactions recorded yet");
        assert_eq!(out.structure().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Rent", "1000", "2024-04-02", "Bills")
            .await;
        env.insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;

        let out = list(env.config()).await.unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines[0], "2 transactions");
        assert!(lines[1].contains("Description"));
        assert!(lines[2].contains("Rent") && lines[2].ends_with("₹1,000.00"));
        assert!(lines[3].contains("Milk") && lines[3].ends_with("₹50.00"));

        let ids: Vec<_> = out.structure().unwrap().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
