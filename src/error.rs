//! Startup error aggregation.
//!
//! Request-time errors (`ValidationError`, `LookupError`, `WriteError`) are
//! handled where they occur and never reach this type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::openstack::ConnectionError;

/// Anything that stops the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}
