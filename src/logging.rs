//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    if headers.headers.get(CONTENT_TYPE) == Some(&"application/json".parse().unwrap()) {
        let display_text = ["password", "oldPass", "newPass"]
            .iter()
            .fold(body_text.clone(), |text, field| {
                redact_json_field(&text, field)
            });
        log_request(&headers, &display_text);
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

/// Replace the string value of `field_name` in a JSON body with asterisks.
///
/// The scan is textual, which is good enough for log output: values
/// containing escaped quotes are truncated rather than leaked in full.
fn redact_json_field(body_text: &str, field_name: &str) -> String {
    let needle = format!("\"{field_name}\"");

    let Some(key_start) = body_text.find(&needle) else {
        return body_text.to_string();
    };
    let after_key = key_start + needle.len();

    let Some(colon_offset) = body_text[after_key..].find(':') else {
        return body_text.to_string();
    };
    let value_search_start = after_key + colon_offset + 1;

    let Some(quote_offset) = body_text[value_search_start..].find('"') else {
        return body_text.to_string();
    };
    let open_quote = value_search_start + quote_offset;

    let Some(close_offset) = body_text[open_quote + 1..].find('"') else {
        return body_text.to_string();
    };
    let close_quote = open_quote + 1 + close_offset;

    format!(
        "{}\"********\"{}",
        &body_text[..open_quote],
        &body_text[close_quote + 1..]
    )
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

// Truncate on character boundaries; bodies may contain multi-byte text such
// as the rupee sign in payment descriptions.
fn truncate_for_log(body: &str) -> String {
    body.chars().take(LOG_BODY_LENGTH_LIMIT).collect()
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            truncate_for_log(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            truncate_for_log(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}
