//! Configuration schema definitions.

use std::path::PathBuf;

/// Root configuration for the username service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Which cloud profile to authenticate with.
    pub cloud: CloudConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Bind address as given by the operator (e.g. ":80", "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: ":80".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Address suitable for `TcpListener::bind`.
    ///
    /// A bare `:port` binds every interface.
    pub fn socket_address(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

/// Cloud account selection.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Name of the profile under `clouds:` in clouds.yaml.
    pub name: String,

    /// Explicit clouds.yaml path; the standard search path is used when unset.
    pub clouds_file: Option<PathBuf>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            name: "openstack".to_string(),
            clouds_file: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    pub log_format: LogFormat,

    /// Prometheus exporter bind address. Metrics are not exported when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "username_service=info,tower_http=info".to_string(),
            log_format: LogFormat::Text,
            metrics_address: None,
        }
    }
}
