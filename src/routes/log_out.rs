//! This file defines the log-out route.

use axum::Json;
use serde_json::{Value, json};

/// A route handler for logging out.
///
/// Auth tokens are stateless, so there is nothing to invalidate server-side;
/// the client discards its token and this handler acknowledges.
pub async fn log_out() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}

#[cfg(test)]
mod log_out_tests {
    use serde_json::{Value, json};

    use crate::{endpoints, routes::test_utils::test_server};

    #[tokio::test]
    async fn log_out_acknowledges() {
        let server = test_server();

        let response = server.post(endpoints::LOG_OUT).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["success"], json!(true));
    }
}
