//! This file defines the log-in route.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    auth::{encode_jwt, validate_credentials},
    state::AuthState,
    stores::{CounterpartyStore, UserStore},
};

/// The body of a log-in request.
///
/// Clients send an email address, a username, or both; the email is tried
/// first. Empty strings count as absent.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email address entered during sign-in.
    #[serde(default)]
    pub email: Option<String>,
    /// The username entered during sign-in.
    #[serde(default)]
    pub username: Option<String>,
    /// The password entered during sign-in.
    #[serde(default)]
    pub password: Option<String>,
}

/// A route handler for signing in a user.
///
/// Logging in also seeds the user's `"me"` counterparty if it does not
/// exist yet.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidRequest] if the password is missing,
/// - [Error::InvalidCredentials] if no user matches the identifiers or the
///   password is wrong.
pub async fn log_in<U, C>(
    State(mut state): State<AuthState<U, C>>,
    Json(data): Json<LogInData>,
) -> Result<Json<Value>, Error>
where
    U: UserStore + Send + Sync,
    C: CounterpartyStore + Send + Sync,
{
    let password = data
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| Error::InvalidRequest("missing field 'password'".to_string()))?;

    let user = validate_credentials(
        &state.user_store,
        &mut state.counterparty_store,
        data.email.as_deref(),
        data.username.as_deref(),
        &password,
    )?;

    let token = encode_jwt(user.username(), state.jwt_keys.encoding_key())?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": {
            "id": user.id(),
            "email": user.email(),
            "username": user.username(),
        },
    })))
}

#[cfg(test)]
mod log_in_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        routes::test_utils::{TEST_PASSWORD, sign_up_test_user, test_server},
    };

    #[tokio::test]
    async fn log_in_succeeds_with_email() {
        let server = test_server();
        sign_up_test_user(&server, "alice").await;

        let response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "alice@test.com",
                "username": "",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["user"]["username"], json!("alice"));
    }

    #[tokio::test]
    async fn log_in_succeeds_with_username() {
        let server = test_server();
        sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "alice",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = test_server();
        sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "alice",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_user() {
        let server = test_server();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "nobody",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_password() {
        let server = test_server();
        sign_up_test_user(&server, "alice").await;

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "alice",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
