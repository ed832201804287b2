//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    fn create(
        &mut self,
        username: &str,
        email: EmailAddress,
        name: &str,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Get a user by their username.
    ///
    /// Returns [Error::NotFound] if no user with the given username exists.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// Get a user by their email address.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Replace the password hash of the user `username`.
    fn update_password(&mut self, username: &str, password_hash: PasswordHash)
    -> Result<(), Error>;

    /// Replace the display name of the user `username` and return the
    /// updated user.
    fn update_name(&mut self, username: &str, name: &str) -> Result<User, Error>;
}
