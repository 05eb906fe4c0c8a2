//! Configuration loading from the process environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::{LogFormat, ServiceConfig};
use crate::config::validation::{validate_config, ValidationIssue};

/// Listen address.
pub const ENV_ADDR: &str = "ADDR";
/// Cloud profile name.
pub const ENV_CLOUD: &str = "OS_CLOUD";
/// Explicit clouds.yaml path.
pub const ENV_CLOUDS_FILE: &str = "OS_CLIENT_CONFIG_FILE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_METRICS_ADDR: &str = "METRICS_ADDR";

/// Configuration could not be turned into a usable service setup.
///
/// Covers both the service's own settings and the cloud credential profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("no clouds.yaml found (searched: {searched})")]
    CloudsFileNotFound { searched: String },

    #[error("failed to read {path}: {source}")]
    CloudsFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    CloudsFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cloud {0:?} not found in clouds.yaml")]
    UnknownCloud(String),

    #[error("cloud {cloud:?}: {reason}")]
    InvalidCloud { cloud: String, reason: String },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn from_env() -> Result<ServiceConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Load and validate configuration from an arbitrary variable lookup.
///
/// Empty values are treated the same as unset ones.
pub fn from_lookup<F>(lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = ServiceConfig::default();

    if let Some(addr) = get(ENV_ADDR) {
        config.listener.bind_address = addr;
    }
    if let Some(cloud) = get(ENV_CLOUD) {
        config.cloud.name = cloud;
    }
    if let Some(path) = get(ENV_CLOUDS_FILE) {
        config.cloud.clouds_file = Some(PathBuf::from(path));
    }
    if let Some(format) = get(ENV_LOG_FORMAT) {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidVar {
                    var: ENV_LOG_FORMAT,
                    reason: format!("expected \"text\" or \"json\", got {other:?}"),
                })
            }
        };
    }
    config.observability.metrics_address = get(ENV_METRICS_ADDR);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
