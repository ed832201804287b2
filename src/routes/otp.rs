//! This file defines the route for sending one-time-passcode emails.

use std::str::FromStr;

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Error, mailer::Mailer, state::MailerState};

/// The body of an OTP request.
#[derive(Debug, Deserialize)]
pub struct SendOtpData {
    /// The address to send the code to.
    #[serde(default)]
    pub email: Option<String>,
    /// The code to send.
    #[serde(default)]
    pub otp: Option<String>,
}

/// A route handler for sending a one-time passcode to an email address.
///
/// Delivery is fire-and-forget: a failure is reported to the caller but
/// never touches any other state.
///
/// # Errors
///
/// This function will return a:
/// - [Error::InvalidRequest] if a field is missing or the email address
///   does not parse,
/// - [Error::EmailDelivery] if the mailer rejects the message.
pub async fn send_otp<M>(
    State(state): State<MailerState<M>>,
    Json(data): Json<SendOtpData>,
) -> Result<Json<Value>, Error>
where
    M: Mailer + Send + Sync,
{
    let (Some(email), Some(otp)) = (
        data.email.filter(|email| !email.is_empty()),
        data.otp.filter(|otp| !otp.is_empty()),
    ) else {
        return Err(Error::InvalidRequest("Missing fields".to_string()));
    };

    let email = EmailAddress::from_str(&email)
        .map_err(|_| Error::InvalidRequest("invalid email address".to_string()))?;

    state.mailer.send_otp(&email, &otp)?;

    Ok(Json(json!({ "success": true })))
}
