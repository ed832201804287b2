//! This file defines the sign-up route.

use std::str::FromStr;

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    auth::{encode_jwt, validate_credentials},
    models::PasswordHash,
    state::AuthState,
    stores::{CounterpartyStore, UserStore},
};

/// The body of a sign-up request.
#[derive(Debug, Deserialize)]
pub struct SignUpData {
    /// The display name of the new user.
    #[serde(default)]
    pub name: Option<String>,
    /// The email address of the new user, unique across users.
    #[serde(default)]
    pub email: Option<String>,
    /// The username of the new user, unique across users.
    #[serde(default)]
    pub username: Option<String>,
    /// The plain-text password chosen by the new user.
    #[serde(default)]
    pub password: Option<String>,
}

/// A route handler for registering a new user.
///
/// The new user is logged in straight away: the response carries a bearer
/// token just like a log-in response, and the `"me"` counterparty is seeded.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidRequest] if a field is missing, empty, or not a valid
///   email address,
/// - [Error::UsernameTaken] or [Error::EmailTaken] if the identifiers are
///   already registered,
/// - [Error::TooWeak] if the password is too easy to guess.
pub async fn sign_up<U, C>(
    State(mut state): State<AuthState<U, C>>,
    Json(data): Json<SignUpData>,
) -> Result<Json<Value>, Error>
where
    U: UserStore + Send + Sync,
    C: CounterpartyStore + Send + Sync,
{
    let name = require_field(data.name, "name")?;
    let email = require_field(data.email, "email")?;
    let username = require_field(data.username, "username")?;
    let password = require_field(data.password, "password")?;

    let email = EmailAddress::from_str(&email)
        .map_err(|_| Error::InvalidRequest("invalid email address".to_string()))?;

    if state.user_store.get_by_username(&username).is_ok() {
        return Err(Error::UsernameTaken);
    }

    if state.user_store.get_by_email(&email.to_string()).is_ok() {
        return Err(Error::EmailTaken);
    }

    let password_hash = PasswordHash::from_raw_password(&password, PasswordHash::DEFAULT_COST)?;
    state
        .user_store
        .create(&username, email, &name, password_hash)?;

    let user = validate_credentials(
        &state.user_store,
        &mut state.counterparty_store,
        None,
        Some(&username),
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

fn require_field(field: Option<String>, field_name: &str) -> Result<String, Error> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::InvalidRequest(format!("missing field '{field_name}'")))
}
