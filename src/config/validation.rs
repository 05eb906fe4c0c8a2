//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the loader handles syntax)
//! - Validate the listen address has a port
//! - Validate the metrics address is a socket address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ServiceConfig → Result<(), Vec<ValidationIssue>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if !has_port(&config.listener.bind_address) {
        issues.push(ValidationIssue {
            field: "listener.bind_address",
            message: format!("{:?} is not host:port", config.listener.bind_address),
        });
    }

    if config.cloud.name.trim().is_empty() {
        issues.push(ValidationIssue {
            field: "cloud.name",
            message: "must not be empty".to_string(),
        });
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            issues.push(ValidationIssue {
                field: "observability.metrics_address",
                message: format!("{addr:?} is not a socket address"),
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn has_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((_, port)) => port.parse::<u16>().is_ok(),
        None => false,
    }
}
