//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_header_and_body_text_from_request(request).await;
    log_body("Received request", &format!("{} {}", parts.method, parts.uri), &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_header_and_body_text_from_response(response).await;
    log_body("Sending response", &format!("{}", parts.status), &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

/// The number of body bytes logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

fn log_body(prefix: &str, summary: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        // The limit may fall inside a multi-byte character; cut on the
        // nearest boundary at or below it so the slice cannot panic.
        let mut cut = LOG_BODY_LENGTH_LIMIT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }

        tracing::info!("{prefix}: {summary}\nbody: {:}...", &body[..cut]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{prefix}: {summary}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod log_body_tests {
    use tracing::subscriber::with_default;

    use super::{LOG_BODY_LENGTH_LIMIT, log_body};

    /// Run `test` with a subscriber that enables the log events.
    ///
    /// The `tracing` macros evaluate their arguments lazily, so without a
    /// subscriber the truncation slice is never taken and these tests would
    /// pass vacuously.
    fn with_subscriber(test: impl FnOnce()) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::sink)
            .finish();

        with_default(subscriber, test);
    }

    #[test]
    fn truncates_multibyte_character_straddling_the_limit() {
        // 63 ASCII bytes followed by a 2 byte character puts the truncation
        // limit inside the character.
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT - 1) + "é";

        with_subscriber(|| log_body("Received request", "POST /api/expenses", &body));
    }

    #[test]
    fn truncates_long_ascii_body() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        with_subscriber(|| log_body("Received request", "POST /api/expenses", &body));
    }

    #[test]
    fn logs_short_body_in_full() {
        with_subscriber(|| log_body("Sending response", "200 OK", "{\"success\":true}"));
    }
}
