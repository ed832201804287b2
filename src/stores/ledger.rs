//! Defines the ledger store trait.

use crate::{Error, ledger::LedgerEntry, models::Transaction};

/// Applies a planned [LedgerEntry] to the store as one logical unit.
pub trait LedgerStore {
    /// Record `entry` for the user `owner`: create the named counterparties
    /// if they are missing, apply the balance deltas, and append the
    /// transaction row.
    ///
    /// Implementations must make the whole sequence atomic: on any failure
    /// none of the writes may be visible, and no other ledger update for the
    /// same (owner, counterparty) may interleave between the balance read
    /// and write.
    fn record(&mut self, owner: &str, entry: LedgerEntry) -> Result<Transaction, Error>;
}
