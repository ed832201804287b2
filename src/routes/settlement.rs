//! This file defines the routes for listing a user's counterparties and
//! their balances.

use axum::{Json, extract::State};

use crate::{
    Error, auth::Claims, models::Counterparty, state::CounterpartyState,
    stores::CounterpartyStore,
};

/// A route handler for the settlement view: the counterparties the
/// authenticated user still has an open (nonzero) balance with.
pub async fn get_settlement<C>(
    State(state): State<CounterpartyState<C>>,
    claims: Claims,
) -> Result<Json<Vec<Counterparty>>, Error>
where
    C: CounterpartyStore + Send + Sync,
{
    let counterparties = state.counterparty_store.get_with_balance(&claims.username)?;

    Ok(Json(counterparties))
}

/// A route handler for listing all of the authenticated user's
/// counterparties, settled or not.
pub async fn get_counterparties<C>(
    State(state): State<CounterpartyState<C>>,
    claims: Claims,
) -> Result<Json<Vec<Counterparty>>, Error>
where
    C: CounterpartyStore + Send + Sync,
{
    let counterparties = state.counterparty_store.get_all(&claims.username)?;

    Ok(Json(counterparties))
}

#[cfg(test)]
mod settlement_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        routes::test_utils::{sign_up_test_user, test_server},
    };

    #[tokio::test]
    async fn settlement_excludes_settled_counterparties() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        // Lend bob 100, then borrow 100 back: bob nets out to zero.
        for (from, to) in [("me", "bob"), ("bob", "me")] {
            server
                .post(endpoints::RECORD_TRANSACTION)
                .authorization_bearer(&token)
                .content_type("application/json")
                .json(&json!({
                    "isPlainTransaction": false,
                    "from": from,
                    "to": to,
                    "amount": 100,
                }))
                .await
                .assert_status_ok();
        }

        server
            .post(endpoints::RECORD_TRANSACTION)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "isPlainTransaction": false,
                "from": "me",
                "to": "carol",
                "amount": 25,
            }))
            .await
            .assert_status_ok();

        let open = server
            .get(endpoints::SETTLEMENT)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();

        assert_eq!(open.len(), 1);
        assert_eq!(open[0]["name"], json!("carol"));
        assert_eq!(open[0]["balance"], json!(25.0));
    }

    #[tokio::test]
    async fn users_lists_every_counterparty_including_me() {
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
            }))
            .await
            .assert_status_ok();

        let counterparties = server
            .get(endpoints::COUNTERPARTIES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();

        let names: Vec<_> = counterparties
            .iter()
            .map(|counterparty| counterparty["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"me".to_string()), "got {names:?}");
        assert!(names.contains(&"bob".to_string()), "got {names:?}");
    }

    #[tokio::test]
    async fn settlement_fails_without_token() {
        let server = test_server();

        server
            .get(endpoints::SETTLEMENT)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
