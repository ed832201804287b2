//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Transaction, TransactionBuilder},
    stores::TransactionStore,
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Insert `builder` into the transaction table, stamped with the current UTC
/// time.
///
/// This is shared with the ledger store, which appends rows inside its own
/// SQL transaction.
pub(crate) fn insert_transaction(
    connection: &Connection,
    builder: &TransactionBuilder,
) -> Result<Transaction, rusqlite::Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, lend, amount, \"to\", description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, user_id, lend, amount, \"to\", description, created_at",
        )?
        .query_row(
            (
                &builder.user_id,
                builder.lend,
                builder.amount,
                &builder.to,
                &builder.description,
                OffsetDateTime::now_utc(),
            ),
            SQLiteTransactionStore::map_row,
        )
}

impl TransactionStore for SQLiteTransactionStore {
    /// Append a new transaction to the database, stamped with the current
    /// UTC time.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn append(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = insert_transaction(&self.connection.lock().unwrap(), &builder)?;

        Ok(transaction)
    }

    /// Retrieve a user's transactions, newest first.
    ///
    /// The id tie-break keeps the order stable for rows created in the same
    /// instant.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_for_user(&self, owner: &str) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, lend, amount, \"to\", description, created_at
                 FROM \"transaction\"
                 WHERE user_id = :user_id
                 ORDER BY created_at DESC, id DESC",
            )?
            .query_map(&[(":user_id", &owner)], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    lend INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    \"to\" TEXT NOT NULL,
                    description TEXT NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = row.get(offset + 1)?;
        let lend = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let to = row.get(offset + 4)?;
        let description = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;

        Ok(Transaction::new_unchecked(
            id,
            user_id,
            lend,
            amount,
            to,
            description,
            created_at,
        ))
    }
}
