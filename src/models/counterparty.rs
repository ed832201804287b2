//! This file defines a counterparty: a named party the owning user has a
//! running balance with.

use serde::{Deserialize, Serialize};

use crate::models::DatabaseID;

/// A named party ("other") that the owning user lends money to or borrows
/// money from, including the sentinel `"me"` seeded at log-in.
///
/// A positive balance means the counterparty owes the user money, a negative
/// balance means the user owes the counterparty. There is at most one
/// counterparty row per (owning user, name) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    id: DatabaseID,
    user_id: String,
    name: String,
    balance: f64,
}

impl Counterparty {
    /// Create a counterparty from parts that are already known to be valid,
    /// e.g. a database row.
    pub fn new(id: DatabaseID, user_id: String, name: String, balance: f64) -> Self {
        Self {
            id,
            user_id,
            name,
            balance,
        }
    }

    /// The counterparty's ID in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The username of the user this counterparty belongs to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The counterparty's name, unique per owning user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The running balance: how much the counterparty owes the user, net.
    pub fn balance(&self) -> f64 {
        self.balance
    }
}
