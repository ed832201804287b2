//! Bearer-token authentication: JWT keys and claims, token encoding and
//! decoding, and credential validation for the log-in and sign-up routes.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    ledger::ME,
    models::User,
    stores::{CounterpartyStore, UserStore},
};

/// How long a token stays valid after issuance.
const TOKEN_DURATION_SECS: i64 = 60 * 60;

/// The keys used to sign and verify JWTs, derived from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Derive the signing and verification keys from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// The encoding key for JWTs.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// The decoding key for JWTs.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

/// The contents of a JSON Web Token.
///
/// The payload is treated as an opaque claims set: only the username is
/// extracted, and callers must treat it as the canonical actor for all
/// subsequent operations.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// The expiry time of the token.
    pub exp: usize,
    /// The time the token was issued.
    pub iat: usize,
    /// The username the token was issued for.
    pub username: String,
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::MissingToken)?;

        let keys = JwtKeys::from_ref(state);

        decode_jwt(bearer.token(), keys.decoding_key())
    }
}

/// Create a token for `username`, valid for one hour.
///
/// # Errors
/// Returns [Error::TokenCreation] if the claims could not be signed.
pub fn encode_jwt(username: &str, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        exp: (now + TOKEN_DURATION_SECS) as usize,
        iat: now as usize,
        username: username.to_owned(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| Error::TokenCreation)
}

/// Decode and verify a token, including its expiry.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, expired, or has
/// an invalid signature.
pub fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::InvalidToken)
}

/// Validate a log-in attempt and return the matching user.
///
/// The email address is tried first, then the username; empty strings count
/// as absent. Every user that is found gets their `"me"` counterparty seeded
/// before the password check, so the sentinel exists from first log-in
/// onwards.
///
/// # Errors
/// Returns [Error::InvalidCredentials] if no user matches or the password is
/// wrong.
pub fn validate_credentials<U, C>(
    user_store: &U,
    counterparty_store: &mut C,
    email: Option<&str>,
    username: Option<&str>,
    password: &str,
) -> Result<User, Error>
where
    U: UserStore,
    C: CounterpartyStore,
{
    if let Some(email) = email.filter(|email| !email.is_empty()) {
        let user = user_store.get_by_email(email).map_err(not_found_to_invalid)?;

        counterparty_store.find_or_create(user.username(), ME)?;

        if verify_password(&user, password)? {
            return Ok(user);
        }
    }

    if let Some(username) = username.filter(|username| !username.is_empty()) {
        let user = user_store
            .get_by_username(username)
            .map_err(not_found_to_invalid)?;

        counterparty_store.find_or_create(user.username(), ME)?;

        if verify_password(&user, password)? {
            return Ok(user);
        }
    }

    Err(Error::InvalidCredentials)
}

fn not_found_to_invalid(error: Error) -> Error {
    match error {
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    }
}

fn verify_password(user: &User, password: &str) -> Result<bool, Error> {
    user.password_hash()
        .verify(password)
        .map_err(|error| Error::HashingError(error.to_string()))
}

#[cfg(test)]
mod jwt_tests {
    use super::{JwtKeys, decode_jwt, encode_jwt};
    use crate::Error;

    #[test]
    fn decode_jwt_gives_correct_username() {
        let keys = JwtKeys::from_secret("foobar");

        let jwt = encode_jwt("alice", keys.encoding_key()).unwrap();
        let claims = decode_jwt(&jwt, keys.decoding_key()).unwrap();

        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn decode_jwt_fails_with_wrong_secret() {
        let keys = JwtKeys::from_secret("foobar");
        let other_keys = JwtKeys::from_secret("not foobar");

        let jwt = encode_jwt("alice", keys.encoding_key()).unwrap();

        assert_eq!(
            decode_jwt(&jwt, other_keys.decoding_key()),
            Err(Error::InvalidToken)
        );
    }

    #[test]
    fn decode_jwt_fails_on_garbage() {
        let keys = JwtKeys::from_secret("foobar");

        assert_eq!(
            decode_jwt("not.a.token", keys.decoding_key()),
            Err(Error::InvalidToken)
        );
    }
}
