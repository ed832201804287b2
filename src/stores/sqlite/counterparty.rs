//! Implements a SQLite backed counterparty store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::Counterparty,
    stores::CounterpartyStore,
};

/// Stores counterparties and their running balances in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCounterpartyStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCounterpartyStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CounterpartyStore for SQLiteCounterpartyStore {
    /// Look up a counterparty by (owner, name), creating it with balance 0
    /// if it is missing.
    ///
    /// The insert goes through `ON CONFLICT DO NOTHING` against the unique
    /// (user_id, name) index, so concurrent calls with the same key resolve
    /// to a single row.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn find_or_create(&mut self, owner: &str, name: &str) -> Result<Counterparty, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO counterparty (user_id, name, balance) VALUES (?1, ?2, 0.0)
             ON CONFLICT(user_id, name) DO NOTHING",
            (owner, name),
        )?;

        let counterparty = connection
            .prepare(
                "SELECT id, user_id, name, balance FROM counterparty
                 WHERE user_id = ?1 AND name = ?2",
            )?
            .query_row((owner, name), Self::map_row)?;

        Ok(counterparty)
    }

    /// Add `delta` to a counterparty's balance as a single atomic increment.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if (owner, name) does not refer to a counterparty,
    /// - [Error::SqlError] if there is some other SQL error.
    fn adjust_balance(
        &mut self,
        owner: &str,
        name: &str,
        delta: f64,
    ) -> Result<Counterparty, Error> {
        let counterparty = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "UPDATE counterparty SET balance = balance + ?3
                 WHERE user_id = ?1 AND name = ?2
                 RETURNING id, user_id, name, balance",
            )?
            .query_row((owner, name, delta), Self::map_row)?;

        Ok(counterparty)
    }

    /// Retrieve all of a user's counterparties.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_all(&self, owner: &str) -> Result<Vec<Counterparty>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, user_id, name, balance FROM counterparty WHERE user_id = :user_id")?
            .query_map(&[(":user_id", &owner)], Self::map_row)?
            .map(|maybe_counterparty| maybe_counterparty.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the counterparties the user still has an open balance with.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if there is an SQL error.
    fn get_with_balance(&self, owner: &str) -> Result<Vec<Counterparty>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, name, balance FROM counterparty
                 WHERE user_id = :user_id AND balance != 0",
            )?
            .query_map(&[(":user_id", &owner)], Self::map_row)?
            .map(|maybe_counterparty| maybe_counterparty.map_err(Error::SqlError))
            .collect()
    }
}

impl CreateTable for SQLiteCounterpartyStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS counterparty (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    balance REAL NOT NULL DEFAULT 0,
                    UNIQUE(user_id, name)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCounterpartyStore {
    type ReturnType = Counterparty;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let balance = row.get(offset + 3)?;

        Ok(Counterparty::new(id, user_id, name, balance))
    }
}
