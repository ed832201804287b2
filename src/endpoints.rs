//! The API endpoint URIs.

/// The root route, which reports that the API is up.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const SIGN_UP: &str = "/signup";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for reading the authenticated user's profile.
pub const PROFILE: &str = "/profile";
/// The route for changing the authenticated user's password.
pub const PROFILE_PASSWORD: &str = "/profile/password";
/// The route for changing the authenticated user's display name.
pub const PROFILE_NAME: &str = "/profile/name";
/// The route for sending a one-time passcode email.
pub const SEND_OTP: &str = "/sendotp";
/// The route for recording a transaction in the ledger.
pub const RECORD_TRANSACTION: &str = "/trans";
/// The route for listing the authenticated user's transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for listing counterparties with an open balance.
pub const SETTLEMENT: &str = "/settlement";
/// The route for listing all of the authenticated user's counterparties.
pub const COUNTERPARTIES: &str = "/users";
