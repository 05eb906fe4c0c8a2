//! Cloud API error definitions.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from a single authenticated API call.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// The service clients could not be constructed.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to read CA certificate {path}: {source}")]
    CaCertRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CA certificate {path}: {source}")]
    CaCertParse {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("authentication failed: {0}")]
    Auth(#[source] CloudError),

    #[error("no {service} endpoint with interface {interface} in the service catalog")]
    MissingEndpoint { service: String, interface: String },

    #[error("invalid {service} endpoint {url:?}: {reason}")]
    InvalidEndpoint {
        service: String,
        url: String,
        reason: String,
    },
}
