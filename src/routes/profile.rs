//! This file defines the routes for reading and updating a user's profile.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Error, auth::Claims, models::PasswordHash, state::UserState, stores::UserStore};

/// A route handler for reading the authenticated user's profile.
///
/// The password hash is deliberately not part of the response.
pub async fn get_profile<U>(
    State(state): State<UserState<U>>,
    claims: Claims,
) -> Result<Json<Value>, Error>
where
    U: UserStore + Send + Sync,
{
    let user = state.user_store.get_by_username(&claims.username)?;

    Ok(Json(json!({
        "id": user.id(),
        "name": user.name(),
        "username": user.username(),
        "email": user.email(),
    })))
}

/// The body of a password-change request.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordData {
    /// The user's current password.
    #[serde(default, rename = "oldPass")]
    pub old_password: Option<String>,
    /// The password to replace it with.
    #[serde(default, rename = "newPass")]
    pub new_password: Option<String>,
}

/// A route handler for changing the authenticated user's password.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidRequest] if either password is missing,
/// - [Error::IncorrectPassword] if the current password is wrong,
/// - [Error::TooWeak] if the new password is too easy to guess.
pub async fn change_password<U>(
    State(mut state): State<UserState<U>>,
    claims: Claims,
    Json(data): Json<ChangePasswordData>,
) -> Result<Json<Value>, Error>
where
    U: UserStore + Send + Sync,
{
    let (Some(old_password), Some(new_password)) = (
        data.old_password.filter(|password| !password.is_empty()),
        data.new_password.filter(|password| !password.is_empty()),
    ) else {
        return Err(Error::InvalidRequest(
            "Both passwords are required".to_string(),
        ));
    };

    let user = state.user_store.get_by_username(&claims.username)?;

    let old_password_matches = user
        .password_hash()
        .verify(&old_password)
        .map_err(|error| Error::HashingError(error.to_string()))?;
    if !old_password_matches {
        return Err(Error::IncorrectPassword);
    }

    let password_hash = PasswordHash::from_raw_password(&new_password, PasswordHash::DEFAULT_COST)?;
    state
        .user_store
        .update_password(&claims.username, password_hash)?;

    Ok(Json(json!({ "success": true })))
}

/// The body of a name-change request.
#[derive(Debug, Deserialize)]
pub struct ChangeNameData {
    /// The display name to switch to.
    #[serde(default, rename = "newName")]
    pub new_name: Option<String>,
}

/// A route handler for changing the authenticated user's display name.
///
/// # Errors
///
/// Returns [Error::InvalidRequest] if the new name is missing or empty.
pub async fn change_name<U>(
    State(mut state): State<UserState<U>>,
    claims: Claims,
    Json(data): Json<ChangeNameData>,
) -> Result<Json<Value>, Error>
where
    U: UserStore + Send + Sync,
{
    let new_name = data
        .new_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidRequest("Invalid name".to_string()))?;

    let user = state.user_store.update_name(&claims.username, &new_name)?;

    Ok(Json(json!({
        "success": true,
        "name": user.name(),
    })))
}

#[cfg(test)]
mod profile_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        routes::test_utils::{TEST_PASSWORD, sign_up_test_user, test_server},
    };

    #[tokio::test]
    async fn get_profile_returns_user_details() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        let response = server
            .get(endpoints::PROFILE)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["username"], json!("alice"));
        assert_eq!(body["email"], json!("alice@test.com"));
        assert_eq!(body["name"], json!("Test User"));
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn get_profile_fails_without_token() {
        let server = test_server();

        server
            .get(endpoints::PROFILE)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_profile_fails_with_garbage_token() {
        let server = test_server();

        server
            .get(endpoints::PROFILE)
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn change_password_requires_correct_old_password() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .patch(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "oldPass": "definitelyNotTheCorrectPassword",
                "newPass": "anotherverysafesecurepassword",
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn change_password_lets_the_user_log_in_with_the_new_one() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;
        let new_password = "anotherverysafesecurepassword";

        server
            .patch(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "oldPass": TEST_PASSWORD,
                "newPass": new_password,
            }))
            .await
            .assert_status_ok();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "alice",
                "password": new_password,
            }))
            .await
            .assert_status_ok();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "username": "alice",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn change_password_fails_with_missing_fields() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .patch(endpoints::PROFILE_PASSWORD)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({ "oldPass": TEST_PASSWORD }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn change_name_returns_the_new_name() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        let response = server
            .patch(endpoints::PROFILE_NAME)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({ "newName": "Alice B." }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["name"], json!("Alice B."));

        let profile = server
            .get(endpoints::PROFILE)
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(profile["name"], json!("Alice B."));
    }

    #[tokio::test]
    async fn change_name_fails_with_missing_name() {
        let server = test_server();
        let token = sign_up_test_user(&server, "alice").await;

        server
            .patch(endpoints::PROFILE_NAME)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
