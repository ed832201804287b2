//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User},
    stores::UserStore,
};

const SELECT_COLUMNS: &str = "id, username, email, name, password";

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UsernameTaken] if the username is already registered,
    /// - [Error::EmailTaken] if the email address is already registered,
    /// - [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        username: &str,
        email: EmailAddress,
        name: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (username, email, name, password) VALUES (?1, ?2, ?3, ?4)",
            (
                username,
                email.to_string(),
                name,
                password_hash.to_string(),
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(User::new(
            id,
            username.to_owned(),
            email,
            name.to_owned(),
            password_hash,
        ))
    }

    /// Get the user with the specified `username`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] error if there is no user with the
    /// specified username or [Error::SqlError] if there are SQL related errors.
    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM user WHERE username = :username"
            ))?
            .query_row(&[(":username", &username)], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user with the specified `email` address.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] error if there is no user with the
    /// specified email or [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM user WHERE email = :email"
            ))?
            .query_row(&[(":email", &email)], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Replace the password hash of the user `username`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] error if there is no user with the
    /// specified username or [Error::SqlError] if there are SQL related errors.
    fn update_password(
        &mut self,
        username: &str,
        password_hash: PasswordHash,
    ) -> Result<(), Error> {
        let rows_changed = self.connection.lock().unwrap().execute(
            "UPDATE user SET password = ?2 WHERE username = ?1",
            (username, password_hash.to_string()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Replace the display name of the user `username`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] error if there is no user with the
    /// specified username or [Error::SqlError] if there are SQL related errors.
    fn update_name(&mut self, username: &str, name: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "UPDATE user SET name = ?2 WHERE username = ?1 RETURNING {SELECT_COLUMNS}"
            ))?
            .query_row((username, name), Self::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    password TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let username = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let name = row.get(offset + 3)?;
        let raw_password_hash: String = row.get(offset + 4)?;

        let email = EmailAddress::new_unchecked(raw_email);
        let password_hash = PasswordHash::new_unchecked(&raw_password_hash);

        Ok(User::new(id, username, email, name, password_hash))
    }
}
