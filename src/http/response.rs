//! Response construction.
//!
//! Building a response is the last fallible step of a request. A failure
//! there is logged and answered with a bare 500.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The response body could not be written.
#[derive(Debug, Error)]
#[error("failed to write response: {0}")]
pub struct WriteError(#[from] axum::http::Error);

/// Build a response with an explicit content type.
pub fn try_respond(
    status: StatusCode,
    content_type: &str,
    body: impl Into<Body>,
) -> Result<Response, WriteError> {
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())?)
}

/// Build a response, falling back to a bare 500 when that fails.
///
/// Only construction is covered here. The body is streamed by hyper after the
/// handler returns, so a client that disconnects mid-write is never seen as a
/// `WriteError`; hyper drops the connection and the request ends there.
pub fn respond(status: StatusCode, content_type: &str, body: impl Into<Body>) -> Response {
    try_respond(status, content_type, body).unwrap_or_else(|err| {
        tracing::error!(error = %err, status = %status, "Failed to write response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// `text/plain` response. Construction failures fall back as in [`respond`].
pub fn plain_text(status: StatusCode, body: impl Into<String>) -> Response {
    respond(status, TEXT_PLAIN, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text() {
        let response = plain_text(StatusCode::BAD_REQUEST, "missing serverID");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"missing serverID");
    }

    #[test]
    fn test_write_failure_becomes_500() {
        let err = try_respond(StatusCode::OK, "text/plain\n", "name").unwrap_err();
        assert!(err.to_string().starts_with("failed to write response"));

        let response = respond(StatusCode::OK, "text/plain\n", "name");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
