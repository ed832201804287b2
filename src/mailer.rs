//! The outbound-mail port.
//!
//! Mail delivery is a fire-and-forget external effect: the application hands
//! a message to a [Mailer] and moves on. No delivery subsystem is designed
//! here; deployments provide their own implementation.

use email_address::EmailAddress;

use crate::Error;

/// Sends one-time-passcode emails on behalf of the application.
pub trait Mailer {
    /// Send the verification code `otp` to `email`.
    ///
    /// # Errors
    /// Returns [Error::EmailDelivery] if the message could not be handed
    /// off. Implementations must not retry.
    fn send_otp(&self, email: &EmailAddress, otp: &str) -> Result<(), Error>;
}

/// A [Mailer] that writes messages to the application log instead of
/// delivering them.
///
/// This is the default wiring: it keeps development and test environments
/// from needing mail credentials.
#[derive(Debug, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_otp(&self, email: &EmailAddress, otp: &str) -> Result<(), Error> {
        tracing::info!("OTP email for {email}: your verification code is {otp}");

        Ok(())
    }
}
