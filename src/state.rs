//! Implements the structs that hold the state of the REST server.
//!
//! Route handlers do not take the full [AppState]: each extracts the substate
//! holding just the stores it needs, which keeps the handlers generic over
//! the persistence ports they actually use.

use axum::extract::FromRef;

use crate::{
    auth::JwtKeys,
    mailer::Mailer,
    stores::{CounterpartyStore, LedgerStore, TransactionStore, UserStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<C, T, U, L, M>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    /// The keys used to sign and verify auth tokens.
    pub jwt_keys: JwtKeys,
    /// The store for managing [counterparties](crate::models::Counterparty)
    /// and their balances.
    pub counterparty_store: C,
    /// The store for managing the append-only
    /// [transaction](crate::models::Transaction) log.
    pub transaction_store: T,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
    /// The store that applies ledger entries as one atomic unit.
    pub ledger_store: L,
    /// The outbound-mail port.
    pub mailer: M,
}

impl<C, T, U, L, M> AppState<C, T, U, L, M>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(
        jwt_secret: &str,
        counterparty_store: C,
        transaction_store: T,
        user_store: U,
        ledger_store: L,
        mailer: M,
    ) -> Self {
        Self {
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            counterparty_store,
            transaction_store,
            user_store,
            ledger_store,
            mailer,
        }
    }
}

// this impl tells the `Claims` extractor how to access the keys from our state
impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for JwtKeys
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        state.jwt_keys.clone()
    }
}

/// The state needed for the log-in and sign-up routes.
#[derive(Clone)]
pub struct AuthState<U, C> {
    /// The keys used to sign auth tokens for validated users.
    pub jwt_keys: JwtKeys,
    /// The store for looking up and creating users.
    pub user_store: U,
    /// The store used to seed the `"me"` counterparty for validated users.
    pub counterparty_store: C,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for AuthState<U, C>
where
    C: CounterpartyStore + Clone + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Clone + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            jwt_keys: state.jwt_keys.clone(),
            user_store: state.user_store.clone(),
            counterparty_store: state.counterparty_store.clone(),
        }
    }
}

/// The state needed to read or update user profiles.
#[derive(Clone)]
pub struct UserState<U> {
    /// The store for managing users.
    pub user_store: U,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for UserState<U>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Clone + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            user_store: state.user_store.clone(),
        }
    }
}

/// The state needed to record ledger entries.
#[derive(Clone)]
pub struct LedgerState<L> {
    /// The store that applies ledger entries as one atomic unit.
    pub ledger_store: L,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for LedgerState<L>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Clone + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            ledger_store: state.ledger_store.clone(),
        }
    }
}

/// The state needed to list a user's transactions.
#[derive(Clone)]
pub struct TransactionState<T> {
    /// The store for managing the transaction log.
    pub transaction_store: T,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for TransactionState<T>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The state needed to list a user's counterparties.
#[derive(Clone)]
pub struct CounterpartyState<C> {
    /// The store for managing counterparties.
    pub counterparty_store: C,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for CounterpartyState<C>
where
    C: CounterpartyStore + Clone + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            counterparty_store: state.counterparty_store.clone(),
        }
    }
}

/// The state needed to send OTP emails.
#[derive(Clone)]
pub struct MailerState<M> {
    /// The outbound-mail port.
    pub mailer: M,
}

impl<C, T, U, L, M> FromRef<AppState<C, T, U, L, M>> for MailerState<M>
where
    C: CounterpartyStore + Send + Sync,
    T: TransactionStore + Send + Sync,
    U: UserStore + Send + Sync,
    L: LedgerStore + Send + Sync,
    M: Mailer + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, T, U, L, M>) -> Self {
        Self {
            mailer: state.mailer.clone(),
        }
    }
}
