//! This module defines the REST API's routes and their handlers.

pub mod log_in;
pub mod log_out;
pub mod otp;
pub mod profile;
pub mod register;
pub mod settlement;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_utils {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{build_router, endpoints, stores::sqlite::create_app_state};

    /// Spin up a test server over an in-memory database.
    pub fn test_server() -> TestServer {
        let state = create_app_state(
            Connection::open_in_memory().expect("Could not open database in memory."),
            "42",
        )
        .expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    /// The password used for every test user; long enough to clear the
    /// strength gate.
    pub const TEST_PASSWORD: &str = "averysafeandsecurepassword";

    /// Register `username` and return a bearer token for them.
    pub async fn sign_up_test_user(server: &TestServer, username: &str) -> String {
        let response = server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .json(&json!({
                "name": "Test User",
                "email": format!("{username}@test.com"),
                "username": username,
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status_ok();

        response.json::<Value>()["token"]
            .as_str()
            .expect("sign-up response did not contain a token")
            .to_string()
    }
}
