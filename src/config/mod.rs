//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (ADDR, OS_CLOUD, ...)
//!     → loader.rs (read variables, apply defaults)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → consumed once by lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Every field has a default so an empty environment is a valid deployment
//! - Cloud credentials are not part of this config; they live in clouds.yaml

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_env, from_lookup, ConfigError};
pub use schema::{CloudConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig};
