//! Defines the transaction store trait.

use crate::{
    Error,
    models::{Transaction, TransactionBuilder},
};

/// Handles the creation and retrieval of transactions.
///
/// The log is append-only: there are deliberately no update or delete
/// operations.
pub trait TransactionStore {
    /// Append a new transaction to the store, stamping it with the current
    /// time.
    fn append(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve the transactions belonging to `owner`, newest first.
    fn get_for_user(&self, owner: &str) -> Result<Vec<Transaction>, Error>;
}
