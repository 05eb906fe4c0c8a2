//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, tracing, graceful shutdown)
//!     → routes.rs (fixed path table)
//!     → health.rs | username.rs
//!     → response.rs (content type, write failure fallback)
//! ```

pub mod health;
pub mod response;
pub mod routes;
pub mod server;
pub mod username;

pub use response::WriteError;
pub use server::{AppState, HttpServer};
