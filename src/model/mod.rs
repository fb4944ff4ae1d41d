//! Types that represent the core data model, such as `Transaction`, `Amount` and `Category`.
mod amount;
mod category;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Categories, Category, DEFAULT_CATEGORIES};
pub use transaction::{Draft, Transaction, TransactionId, DATE_FORMAT};

pub(crate) use amount::AMOUNT_TOO_LARGE;
pub(crate) use transaction::Fields;
