//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated at `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const SENSITIVE_HEADERS: [axum::http::HeaderName; 4] =
    [AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, SET_COOKIE];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level with
/// credentials redacted. If a body is longer than [LOG_BODY_LENGTH_LIMIT]
/// bytes, it is truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    mark_sensitive_headers(&mut parts.headers);

    let Some(body_text) = read_body(body).await else {
        return (StatusCode::BAD_REQUEST, "Could not read request body").into_response();
    };
    log_body("Received request", &parts, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    mark_sensitive_headers(&mut parts.headers);

    let Some(body_text) = read_body(body).await else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    log_body("Sending response", &parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

/// Flag credential headers so their values print as "Sensitive".
fn mark_sensitive_headers(headers: &mut HeaderMap) {
    for name in SENSITIVE_HEADERS {
        if let axum::http::header::Entry::Occupied(mut entry) = headers.entry(name) {
            for value in entry.iter_mut() {
                value.set_sensitive(true);
            }
        }
    }
}

async fn read_body(body: Body) -> Option<String> {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(error) => {
            tracing::error!("Could not read body for logging: {error}");
            None
        }
    }
}

/// The longest prefix of `body` that fits in `limit` bytes without
/// splitting a character.
fn truncate(body: &str, limit: usize) -> &str {
    let end = body
        .char_indices()
        .map(|(index, character)| index + character.len_utf8())
        .take_while(|end| *end <= limit)
        .last()
        .unwrap_or(0);

    &body[..end]
}

fn log_body(message: &str, head: &impl std::fmt::Debug, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{message}: {head:#?}\nbody: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}: {head:#?}\nbody: {body:?}");
    }
}
