use std::{
    error::Error,
    path::Path,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;

use hisaab::{
    models::{PasswordHash, ValidatedPassword},
    stores::{UserStore, sqlite::SQLiteUserStore},
};

/// A utility for changing the password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username of the user whose password should be replaced.
    #[arg(long)]
    username: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !Path::new(&args.db_path).is_file() {
        eprintln!("No database found at {}", args.db_path);
        exit(1);
    }

    let conn = Connection::open(&args.db_path)?;
    let mut user_store = SQLiteUserStore::new(Arc::new(Mutex::new(conn)));

    // Fail before prompting if the username is wrong.
    user_store.get_by_username(&args.username)?;

    let password = rpassword::prompt_password("New password: ")?;
    let confirmed_password = rpassword::prompt_password("Confirm new password: ")?;

    if password != confirmed_password {
        eprintln!("Passwords do not match.");
        exit(1);
    }

    let validated_password = match ValidatedPassword::new(&password) {
        Ok(validated_password) => validated_password,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    let password_hash = PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST)?;
    user_store.update_password(&args.username, password_hash)?;

    println!("Password updated for {}.", args.username);

    Ok(())
}
