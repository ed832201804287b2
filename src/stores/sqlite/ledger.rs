//! Implements a SQLite backed ledger store.
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    ledger::LedgerEntry,
    models::Transaction,
    stores::{LedgerStore, sqlite::transaction::insert_transaction},
};

/// Applies planned ledger entries to a SQLite database.
///
/// The counterparty and transaction tables must have been set up in the
/// database (see [initialize](crate::db::initialize)); this store has no
/// table of its own.
#[derive(Debug, Clone)]
pub struct SQLiteLedgerStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteLedgerStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl LedgerStore for SQLiteLedgerStore {
    /// Record a ledger entry: upsert the counterparties named by the deltas,
    /// apply each delta as an atomic increment, and append the transaction
    /// row.
    ///
    /// The whole sequence runs inside one SQL transaction while holding the
    /// connection lock, so a failure leaves no orphaned writes and no other
    /// ledger update can interleave between the balance read and write.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error; in that case
    /// none of the writes are visible.
    fn record(&mut self, owner: &str, entry: LedgerEntry) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let tx = connection.unchecked_transaction()?;

        for (name, delta) in &entry.deltas {
            tx.execute(
                "INSERT INTO counterparty (user_id, name, balance) VALUES (?1, ?2, 0.0)
                 ON CONFLICT(user_id, name) DO NOTHING",
                (owner, name.as_str()),
            )?;
            tx.execute(
                "UPDATE counterparty SET balance = balance + ?3
                 WHERE user_id = ?1 AND name = ?2",
                (owner, name.as_str(), *delta),
            )?;
        }

        let transaction = insert_transaction(
            &tx,
            &Transaction::build(owner, entry.amount, &entry.to)
                .lend(entry.lend)
                .description(&entry.description),
        )?;

        tx.commit()?;

        Ok(transaction)
    }
}
