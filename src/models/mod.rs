//! This module defines the domain models and their supporting types.

mod counterparty;
mod password;
mod transaction;
mod user;

pub use counterparty::Counterparty;
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{Transaction, TransactionBuilder};
pub use user::User;

/// An alias for the integer IDs used by the database.
pub type DatabaseID = i64;
