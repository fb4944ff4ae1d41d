//! Delete command handler.

use crate::commands::Out;
use crate::model::{Transaction, TransactionId};
use crate::store::Mutation;
use crate::{Config, Result};

/// Deletes the transaction with `id`. An unknown id changes nothing and is reported as a warning.
pub async fn delete(config: Config, id: TransactionId) -> Result<Out<Transaction>> {
    let mut tracker = config.tracker().await?;
    let Some(removed) = tracker.ledger().get(id).cloned() else {
        return Ok(Out::new_warning(format!(
            "There is no transaction with id {id}, nothing was deleted"
        )));
    };

    Ok(match tracker.remove(id).await? {
        Mutation::Applied => Out::new(
            format!("Deleted transaction {id}: {}", removed.description()),
            removed,
        ),
        Mutation::Missing => Out::new_warning(format!(
            "There is no transaction with id {id}, nothing was deleted"
        )),
    })
}
