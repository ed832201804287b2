//! This file defines the routes for recording and listing transactions.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    auth::Claims,
    ledger::{LedgerEntry, RecordRequest},
    models::Transaction,
    state::{LedgerState, TransactionState},
    stores::{LedgerStore, TransactionStore},
};

/// A route handler for recording a transaction in the ledger.
///
/// The request is validated and resolved into a [LedgerEntry] before any
/// store access; the entry is then applied as one atomic unit.
///
/// # Errors
///
/// Returns [Error::InvalidRequest] if `to`, `amount`, or (for lend
/// transactions) `from` is missing or invalid. No state is mutated in that
/// case.
pub async fn record_transaction<L>(
    State(mut state): State<LedgerState<L>>,
    claims: Claims,
    Json(request): Json<RecordRequest>,
) -> Result<Json<Value>, Error>
where
    L: LedgerStore + Send + Sync,
{
    let entry = LedgerEntry::plan(request)?;

    state.ledger_store.record(&claims.username, entry)?;

    Ok(Json(json!({ "success": true })))
}

/// A route handler for listing the authenticated user's transactions,
/// newest first.
pub async fn get_transactions<T>(
    State(state): State<TransactionState<T>>,
    claims: Claims,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore + Send + Sync,
{
    let transactions = state.transaction_store.get_for_user(&claims.username)?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod record_transaction_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        routes::test_utils::{sign_up_test_user, test_server},
    };

    async fn settlement(server: &axum_test::TestServer, token: &str) -> Vec<Value> {
        server
            .get(endpoints::SETTLEMENT)
            .authorization_bearer(token)
            .await
            .json::<Vec<Value>>()
    }

    #[tokio::test]
    async fn lend_to_counterparty_raises_their_balance() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "me",
                "to": "bob",
                "amount": 100,
                "description": "lunch",
            }))
            .await
            .assert_status_ok();

        let open = settlement(&server, &token).await;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0]["name"], json!("bob"));
        assert_eq!(open[0]["balance"], json!(100.0));

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["lend"], json!(true));
        assert_eq!(transactions[0]["amount"], json!(100.0));
        assert_eq!(transactions[0]["to"], json!("bob"));
        assert_eq!(transactions[0]["description"], json!("lunch"));
    }

    #[tokio::test]
    async fn borrow_from_counterparty_lowers_their_balance() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "bob",
                "to": "me",
                "amount": 40,
            }))
            .await
            .assert_status_ok();

        let open = settlement(&server, &token).await;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0]["name"], json!("bob"));
        assert_eq!(open[0]["balance"], json!(-40.0));

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(transactions[0]["amount"], json!(-40.0));
        assert_eq!(transactions[0]["to"], json!("bob"));
    }

    #[tokio::test]
    async fn indirect_payment_moves_balance_and_conserves_value() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "bob",
                "to": "carol",
                "amount": 50,
            }))
            .await
            .assert_status_ok();

        let open = settlement(&server, &token).await;
        assert_eq!(open.len(), 2);
        let balance_of = |name: &str| {
            open.iter()
                .find(|counterparty| counterparty["name"] == json!(name))
                .unwrap()["balance"]
                .as_f64()
                .unwrap()
        };
        assert_eq!(balance_of("bob"), -50.0);
        assert_eq!(balance_of("carol"), 50.0);
        assert_eq!(balance_of("bob") + balance_of("carol"), 0.0);

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["lend"], json!(false));
        assert_eq!(transactions[0]["amount"], json!(0.0));
        assert_eq!(transactions[0]["to"], json!("Indirect Payment"));
        assert_eq!(
            transactions[0]["description"],
            json!("bob paid ₹50 to carol")
        );
    }

    #[tokio::test]
    async fn plain_transaction_changes_no_balances() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": true,
                "to": "groceries",
                "amount": 42.5,
            }))
            .await
            .assert_status_ok();

        assert!(settlement(&server, &token).await.is_empty());

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["lend"], json!(false));
    }

    #[tokio::test]
    async fn self_transfer_changes_no_balances() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "me",
                "to": "me",
                "amount": 10,
            }))
            .await
            .assert_status_ok();

        assert!(settlement(&server, &token).await.is_empty());
    }

    #[tokio::test]
    async fn invalid_request_writes_nothing() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        for body in [
            json!({ "isPlainTransaction": false, "from": "me", "amount": 10 }),
            json!({ "isPlainTransaction": false, "from": "me", "to": "bob" }),
            json!({ "isPlainTransaction": false, "from": "me", "to": "bob", "amount": "ten" }),
            json!({ "isPlainTransaction": false, "to": "bob", "amount": 10 }),
        ] {
            server
                .post(endpoints::RECORD_TRANSACTION)
                .authorization_bearer(&token)
                .content_type("application/json")
                .json(&body)
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();
        assert!(transactions.is_empty());
        assert!(settlement(&server, &token).await.is_empty());
    }

    #[tokio::test]
    async fn record_fails_without_token() {
        let server = test_server();

        server
            .post(endpoints::RECORD_TRANSACTION)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": true,
                "to": "bob",
                "amount": 10,
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn record_fails_with_garbage_token() {
        let server = test_server();

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer("not.a.token")
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": true,
                "to": "bob",
                "amount": 10,
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn transactions_are_scoped_to_the_authenticated_user() {
        let server = test_server();
        let alice = sign_up_test_user(&server, "alice").await;
        let dave = sign_up_test_user(&server, "dave").await;

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&alice)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "me",
                "to": "bob",
                "amount": 100,
            }))
            .await
            .assert_status_ok();

        let daves_transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&dave)
            .await
            .json::<Vec<Value>>();
        assert!(daves_transactions.is_empty());
        assert!(settlement(&server, &dave).await.is_empty());
    }
}
