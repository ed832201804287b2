//! The ledger-update algorithm.
//!
//! A recording request names a payer (`from`), a payee (`to`) and an amount,
//! where either side may be the authenticated user (the `"me"` sentinel) or a
//! named counterparty. [LedgerEntry::plan] turns a validated request into the
//! exact set of writes to perform: at most two counterparty balance deltas
//! plus one immutable transaction row. A
//! [LedgerStore](crate::stores::LedgerStore) then applies the whole entry as
//! one atomic unit.
//!
//! Keeping the routing rules as a pure function means every sign convention
//! in this module can be tested without touching a database.

use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// The sentinel counterparty name that refers to the authenticated user.
pub const ME: &str = "me";

/// The label recorded on transactions where two third parties settled between
/// themselves and the user is only a bystander.
pub const INDIRECT_PAYMENT_LABEL: &str = "Indirect Payment";

/// The body of a transaction-recording request.
///
/// `amount` is accepted as a JSON number or a numeric string; everything else
/// is rejected before any store access.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    /// Selects a plain spending record instead of a lend transaction.
    #[serde(default)]
    pub is_plain_transaction: bool,
    /// The paying side of a lend transaction: a counterparty name or `"me"`.
    #[serde(default)]
    pub from: Option<String>,
    /// The receiving side: a counterparty name or `"me"`.
    #[serde(default)]
    pub to: Option<String>,
    /// The amount of money that changed hands.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The writes a single recording request boils down to.
///
/// Produced by [LedgerEntry::plan] and executed atomically by a
/// [LedgerStore](crate::stores::LedgerStore).
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Balance adjustments to apply, as (counterparty name, delta) pairs.
    /// Each named counterparty is created with balance 0 if it does not
    /// exist yet. Holds zero, one, or two entries.
    pub deltas: Vec<(String, f64)>,
    /// Whether the transaction row is flagged as a lend.
    pub lend: bool,
    /// The signed amount recorded on the transaction row.
    pub amount: f64,
    /// The label recorded on the transaction row.
    pub to: String,
    /// The description recorded on the transaction row.
    pub description: String,
}

impl LedgerEntry {
    /// Validate a recording request and resolve it into the writes to
    /// perform, per the routing rules:
    ///
    /// - plain transaction: one row, no balance changes;
    /// - lend from `"me"` to X: X's balance goes up by the amount;
    /// - lend from X to `"me"`: X's balance goes down by the amount, and the
    ///   row records the negated amount against X;
    /// - lend from X to Y (neither `"me"`): X down, Y up, and one
    ///   zero-amount "Indirect Payment" row describing the settlement.
    ///
    /// The `"me"` comparison lowercases `from` and `to` first; a lend
    /// entry's lookups and labels use the lowercased names.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidRequest] if `to` is missing or empty, if
    /// `amount` is missing, zero, or not a number, or if `from` is missing
    /// on a lend-mode request. No store access happens before validation
    /// passes.
    pub fn plan(request: RecordRequest) -> Result<Self, Error> {
        let to = request
            .to
            .filter(|to| !to.is_empty())
            .ok_or_else(|| Error::InvalidRequest("missing or invalid parameters".to_string()))?;
        let amount = parse_amount(request.amount.as_ref())
            .ok_or_else(|| Error::InvalidRequest("missing or invalid parameters".to_string()))?;
        let description = request.description.unwrap_or_default();

        if request.is_plain_transaction {
            return Ok(Self {
                deltas: Vec::new(),
                lend: false,
                amount,
                to,
                description,
            });
        }

        let from = request
            .from
            .filter(|from| !from.is_empty())
            .ok_or_else(|| {
                Error::InvalidRequest("missing 'from' in lend transaction".to_string())
            })?;

        let from = from.to_lowercase();
        let to = to.to_lowercase();

        let entry = match (from == ME, to == ME) {
            // A self-transfer creates no debt.
            (true, true) => Self {
                deltas: Vec::new(),
                lend: false,
                amount,
                to,
                description,
            },
            // The user lent money: the counterparty owes them more.
            (true, false) => Self {
                deltas: vec![(to.clone(), amount)],
                lend: true,
                amount,
                to,
                description,
            },
            // The user borrowed money: the counterparty is owed more.
            (false, true) => Self {
                deltas: vec![(from.clone(), -amount)],
                lend: true,
                amount: -amount,
                to: from,
                description,
            },
            // Two third parties settled between themselves; the deltas cancel
            // out so the ledger's total value is conserved.
            (false, false) => Self {
                description: format!("{from} paid ₹{amount} to {to}"),
                deltas: vec![(from, -amount), (to, amount)],
                lend: false,
                amount: 0.0,
                to: INDIRECT_PAYMENT_LABEL.to_string(),
            },
        };

        Ok(entry)
    }
}

/// Parse the wire representation of an amount.
///
/// Accepts a JSON number or a numeric string (the wire format clients
/// historically sent both). Zero and non-numeric values yield `None`.
fn parse_amount(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse().ok()?,
        _ => return None,
    };

    (amount != 0.0).then_some(amount)
}
