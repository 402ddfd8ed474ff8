//! Responses produced by the server itself rather than by a handler.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Body sent to requests rejected while draining.
pub const SHUTTING_DOWN_BODY: &str = "Server is shutting down.";

/// 502 with `Connection: close`, so the client does not reuse the connection.
pub fn shutting_down() -> Response {
    let mut response = (StatusCode::BAD_GATEWAY, Body::from(SHUTTING_DOWN_BODY)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
