// src/logging_middleware.rs
//! Request/response logging. Bodies are only buffered when debug logging is on.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, enabled, info, Level};

const MAX_LOGGED_BODY: usize = 4096;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

/// Renders a body for the log line: pretty JSON when possible, truncated text otherwise
fn render_body(bytes: &Bytes, json: bool) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    if json {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            return serde_json::to_string_pretty(&value).ok();
        }
    }
    if text.len() > MAX_LOGGED_BODY {
        let cut = (0..=MAX_LOGGED_BODY)
            .rev()
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(0);
        return Some(format!("{}... ({} bytes)", &text[..cut], text.len()));
    }
    Some(text.to_string())
}

/// Logs every request with status and latency; at debug level also logs bodies
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    if !enabled!(Level::DEBUG) {
        let response = next.run(request).await;
        info!(
            method = %method,
            uri = %uri,
            status = %response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request handled"
        );
        return Ok(response);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    if let Some(rendered) = render_body(&bytes, is_json(&parts.headers)) {
        debug!(method = %method, uri = %uri, request_body = %rendered, "Request body");
    }

    let response = next
        .run(Request::from_parts(parts, Body::from(bytes)))
        .await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(rendered) = render_body(&bytes, is_json(&parts.headers)) {
        debug!(status = %parts.status, response_body = %rendered, "Response body");
    }

    info!(
        method = %method,
        uri = %uri,
        status = %parts.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
