//! Hisaab is a personal-finance ledger backend.
//!
//! Users track money they lent to or borrowed from named counterparties
//! ("others"), record plain transactions, and view a running per-counterparty
//! balance (the settlement view). The library provides the REST API server:
//! JSON over HTTP with bearer-token (JWT) authentication, backed by SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod auth;
pub mod db;
mod endpoints;
pub mod ledger;
mod logging;
pub mod mailer;
pub mod models;
mod routes;
mod routing;
mod state;
pub mod stores;

pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request had no `Authorization: Bearer` header.
    #[error("no auth token provided")]
    MissingToken,

    /// The bearer token was malformed, expired, or had an invalid signature.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The user provided an invalid combination of email/username and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current password given for a password change was wrong.
    #[error("incorrect current password")]
    IncorrectPassword,

    /// A request was missing a parameter or had one that could not be parsed.
    ///
    /// The string is safe to show to the client.
    #[error("{0}")]
    InvalidRequest(String),

    /// The username chosen at sign-up is already registered.
    #[error("username not available")]
    UsernameTaken,

    /// The email address chosen at sign-up is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An auth token could not be created for a validated user.
    #[error("could not create auth token")]
    TokenCreation,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An OTP email could not be handed to the mailer.
    ///
    /// Mail delivery is a fire-and-forget effect: this error never implies
    /// that ledger state was touched.
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.username") =>
            {
                Error::UsernameTaken
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::EmailTaken
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::MissingToken | Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            // The original API distinguishes a missing token (401) from a bad
            // one (403), and clients rely on the distinction.
            Error::InvalidToken | Error::IncorrectPassword => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            Error::InvalidRequest(_) | Error::TooWeak(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::UsernameTaken | Error::EmailTaken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
