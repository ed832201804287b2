//! Defines the counterparty store trait.

use crate::{Error, models::Counterparty};

/// Handles the creation and retrieval of counterparties and their running
/// balances.
pub trait CounterpartyStore {
    /// Look up the counterparty `name` belonging to `owner`, creating it
    /// with balance 0 if it does not exist.
    ///
    /// Implementations must not create duplicate rows when called
    /// concurrently with the same (owner, name) pair.
    fn find_or_create(&mut self, owner: &str, name: &str) -> Result<Counterparty, Error>;

    /// Add `delta` to the balance of the counterparty `name` belonging to
    /// `owner` and return the updated counterparty.
    ///
    /// Implementations must apply the delta as a single atomic increment so
    /// that concurrent adjustments cannot lose updates.
    fn adjust_balance(&mut self, owner: &str, name: &str, delta: f64)
    -> Result<Counterparty, Error>;

    /// Retrieve all counterparties belonging to `owner`.
    fn get_all(&self, owner: &str) -> Result<Vec<Counterparty>, Error>;

    /// Retrieve the counterparties belonging to `owner` with a nonzero
    /// balance: the settlement view.
    fn get_with_balance(&self, owner: &str) -> Result<Vec<Counterparty>, Error>;
}
