//! This file defines a transaction: an immutable entry in a user's ledger.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::DatabaseID;

/// An entry in a user's ledger.
///
/// Transactions are append-only: once created they are never updated or
/// deleted. `lend` distinguishes entries that moved a counterparty balance
/// from plain spending records; `to` is a free-text label that is usually a
/// counterparty name but may be synthetic (e.g. "Indirect Payment").
///
/// To create a `Transaction`, use [Transaction::build] and pass the builder
/// to a [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    user_id: String,
    lend: bool,
    amount: f64,
    to: String,
    description: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Build a new transaction for the user `user_id`.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(user_id: &str, amount: f64, to: &str) -> TransactionBuilder {
        TransactionBuilder::new(user_id, amount, to)
    }

    /// Create a transaction from parts that are already known to be valid,
    /// e.g. a database row.
    pub fn new_unchecked(
        id: DatabaseID,
        user_id: String,
        lend: bool,
        amount: f64,
        to: String,
        description: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            lend,
            amount,
            to,
            description,
            created_at,
        }
    }

    /// The transaction's ID in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The username of the user this transaction belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether this transaction adjusted a counterparty balance.
    pub fn lend(&self) -> bool {
        self.lend
    }

    /// The signed amount of the transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The label of the receiving side.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// The free-text description of the transaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the transaction was recorded.
    pub fn created_at(&self) -> &OffsetDateTime {
        &self.created_at
    }
}

/// Builder for creating new [Transaction]s.
///
/// Finalize the builder by passing it to
/// [TransactionStore::append](crate::stores::TransactionStore::append).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The username of the user the transaction belongs to.
    pub user_id: String,
    /// Whether the transaction adjusted a counterparty balance.
    pub lend: bool,
    /// The signed amount.
    pub amount: f64,
    /// The label of the receiving side.
    pub to: String,
    /// The free-text description.
    pub description: String,
}

impl TransactionBuilder {
    /// Create a builder for a plain (non-lend) transaction with an empty
    /// description.
    pub fn new(user_id: &str, amount: f64, to: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            lend: false,
            amount,
            to: to.to_owned(),
            description: String::new(),
        }
    }

    /// Mark the transaction as one that adjusted a counterparty balance.
    pub fn lend(mut self, lend: bool) -> Self {
        self.lend = lend;
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Finalise the builder into a [Transaction].
    ///
    /// This is intended for store implementations and tests; `id` and
    /// `created_at` come from the database insert.
    pub fn finalise(self, id: DatabaseID, created_at: OffsetDateTime) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            lend: self.lend,
            amount: self.amount,
            to: self.to,
            description: self.description,
            created_at,
        }
    }
}
