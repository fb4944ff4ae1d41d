use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{Draft, Transaction, DATE_FORMAT};
use crate::{Config, Result};

/// Validates and records a new transaction. The new record is returned as the structured output.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    let mut tracker = config.tracker().await?;
    let draft = Draft::new(
        args.description(),
        args.amount(),
        args.date(),
        args.category(),
    );
    let transaction = tracker.add(&draft).await?;

    let message = format!(
        "Added transaction {}: {} {} ({}) on {}",
        transaction.id(),
        transaction.description(),
        transaction.amount().format(config.currency_symbol()),
        transaction.category(),
        transaction.date().format(DATE_FORMAT),
    );
    Ok(Out::new(message, transaction))
}
