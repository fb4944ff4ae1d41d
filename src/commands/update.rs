//! Update command handler.

use crate::args::UpdateArgs;
use crate::commands::Out;
use crate::model::{Draft, Transaction};
use crate::store::Mutation;
use crate::{Config, Result};
use tracing::debug;

/// Overwrites a transaction. Fields missing from `args` keep the stored record's values, and the
/// merged draft goes through the same validation as a new transaction.
///
/// An unknown id changes nothing and is reported as a warning rather than an error.
pub async fn update(config: Config, args: UpdateArgs) -> Result<Out<Transaction>> {
    let mut tracker = config.tracker().await?;
    let id = args.id();

    let Some(existing) = tracker.ledger().get(id) else {
        return Ok(Out::new_warning(format!(
            "There is no transaction with id {id}, nothing was updated"
        )));
    };

    let mut draft = Draft::from_transaction(existing);
    if let Some(description) = args.description() {
        draft.description = description.to_string();
    }
    if let Some(amount) = args.amount() {
        draft.amount = amount.to_string();
    }
    if let Some(date) = args.date() {
        draft.date = date.to_string();
    }
    if let Some(category) = args.category() {
        draft.category = category.to_string();
    }
    debug!("Updating transaction {id} with {draft:?}");

    match tracker.update(id, &draft).await? {
        Mutation::Applied => {}
        Mutation::Missing => {
            return Ok(Out::new_warning(format!(
                "There is no transaction with id {id}, nothing was updated"
            )))
        }
    }

    match tracker.ledger().get(id) {
        Some(updated) => Ok(Out::new(
            format!("Updated transaction {id}"),
            updated.clone(),
        )),
        None => Ok(Out::new_message(format!("Updated transaction {id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::model::Amount;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;

        let out = update(env.config(), UpdateArgs::new(1).with_amount("65.25"))
            .await
            .unwrap();
        assert!(!out.is_warning());
        let updated = out.structure().unwrap();
        assert_eq!(updated.id(), 1);
        assert_eq!(updated.description(), "Milk");
        assert_eq!(updated.amount(), "65.25".parse::<Amount>().unwrap());

        let tracker = env.config().tracker().await.unwrap();
        assert_eq!(tracker.list(), [updated.clone()]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_warning() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;

        let out = update(env.config(), UpdateArgs::new(7).with_description("Eggs"))
            .await
            .unwrap();
        assert!(out.is_warning());
        assert!(out.structure().is_none());

        let tracker = env.config().tracker().await.unwrap();
        assert_eq!(tracker.list()[0].description(), "Milk");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_values() {
        let env = TestEnv::new().await;
        let before = env
            .insert_test_transaction("Milk", "50", "2024-04-01", "Groceries")
            .await;

        let err = update(env.config(), UpdateArgs::new(1).with_amount("-3"))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<LedgerError>().map(LedgerError::message),
            Some("Amount must be a positive number")
        );

        let err = update(env.config(), UpdateArgs::new(1).with_description("   "))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<LedgerError>().map(LedgerError::message),
            Some("Please fill all fields")
        );

        let tracker = env.config().tracker().await.unwrap();
        assert_eq!(tracker.list(), [before]);
    }
}
