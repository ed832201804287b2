//! Contains convenience type alias and function for [AppState] that uses
//! the SQLite backend.

pub mod counterparty;
pub mod ledger;
pub mod transaction;
pub mod user;

pub use counterparty::SQLiteCounterpartyStore;
pub use ledger::SQLiteLedgerStore;
pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize, mailer::LogMailer};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<
    SQLiteCounterpartyStore,
    SQLiteTransactionStore,
    SQLiteUserStore,
    SQLiteLedgerStore,
    LogMailer,
>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(db_connection: Connection, jwt_secret: &str) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        jwt_secret,
        SQLiteCounterpartyStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection.clone()),
        SQLiteLedgerStore::new(connection),
        LogMailer,
    ))
}
