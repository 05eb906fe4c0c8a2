//! Username service library.
//!
//! Resolves a compute instance ID to the display name of the user that owns
//! it, by asking the compute API for the instance's owner and the identity
//! API for that user's name.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod openstack;
pub mod resolver;

pub use config::ServiceConfig;
pub use error::StartupError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolver::UsernameResolver;
