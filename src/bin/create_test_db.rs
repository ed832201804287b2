use std::{error::Error, path::Path, process::exit, sync::{Arc, Mutex}};

use clap::Parser;
use rusqlite::Connection;
use serde_json::json;

use hisaab::{
    initialize_db,
    ledger::{LedgerEntry, RecordRequest},
    models::{PasswordHash, ValidatedPassword},
    stores::{
        CounterpartyStore, LedgerStore, UserStore,
        sqlite::{SQLiteCounterpartyStore, SQLiteLedgerStore, SQLiteUserStore},
    },
};

/// A utility for creating a test database for the REST API server of hisaab.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));
    let mut user_store = SQLiteUserStore::new(connection.clone());
    let mut counterparty_store = SQLiteCounterpartyStore::new(connection.clone());
    let mut ledger_store = SQLiteLedgerStore::new(connection);

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    user_store.create("test", "test@example.com".parse()?, "Test User", password_hash)?;
    counterparty_store.find_or_create("test", "me")?;

    println!("Recording test transactions...");

    let requests = [
        json!({ "isPlainTransaction": true, "to": "groceries", "amount": 42.5, "description": "weekly shop" }),
        json!({ "isPlainTransaction": false, "from": "me", "to": "bob", "amount": 100, "description": "lunch" }),
        json!({ "isPlainTransaction": false, "from": "carol", "to": "me", "amount": 30 }),
        json!({ "isPlainTransaction": false, "from": "bob", "to": "carol", "amount": 50 }),
    ];

    for request in requests {
        let request: RecordRequest = serde_json::from_value(request)?;
        ledger_store.record("test", LedgerEntry::plan(request)?)?;
    }

    println!("Success!");

    Ok(())
}
