//! This file defines a user of the application.

use email_address::EmailAddress;

use crate::models::{DatabaseID, PasswordHash};

/// A user of the application.
///
/// The username is what the other tables join on; the integer ID only exists
/// so the profile view can echo it back.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: DatabaseID,
    username: String,
    email: EmailAddress,
    name: String,
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from parts that are already known to be valid, e.g. a
    /// database row.
    pub fn new(
        id: DatabaseID,
        username: String,
        email: EmailAddress,
        name: String,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username,
            email,
            name,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The unique username that the user's counterparties and transactions
    /// are keyed on.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}
