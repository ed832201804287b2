//! Application router configuration.

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{
    AppState, endpoints,
    mailer::Mailer,
    routes::{
        log_in::log_in,
        log_out::log_out,
        otp::send_otp,
        profile::{change_name, change_password, get_profile},
        register::sign_up,
        settlement::{get_counterparties, get_settlement},
        transaction::{get_transactions, record_transaction},
    },
    stores::{CounterpartyStore, LedgerStore, TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
///
/// Routes that identify the caller do so through the bearer-token `Claims`
/// extractor; there is no separate auth middleware layer.
pub fn build_router<C, T, U, L, M>(state: AppState<C, T, U, L, M>) -> Router
where
    C: CounterpartyStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    L: LedgerStore + Clone + Send + Sync + 'static,
    M: Mailer + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::SIGN_UP, post(sign_up::<U, C>))
        .route(endpoints::LOG_IN, post(log_in::<U, C>))
        .route(endpoints::LOG_OUT, post(log_out))
        .route(endpoints::PROFILE, get(get_profile::<U>))
        .route(endpoints::PROFILE_PASSWORD, patch(change_password::<U>))
        .route(endpoints::PROFILE_NAME, patch(change_name::<U>))
        .route(endpoints::SEND_OTP, post(send_otp::<M>))
        .route(
            endpoints::RECORD_TRANSACTION,
            post(record_transaction::<L>),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions::<T>))
        .route(endpoints::SETTLEMENT, get(get_settlement::<C>))
        .route(endpoints::COUNTERPARTIES, get(get_counterparties::<C>))
        .with_state(state)
}

/// The root path reports that the API is up.
async fn get_index() -> &'static str {
    "Hisaab API running!"
}
