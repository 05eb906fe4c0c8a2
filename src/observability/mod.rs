//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and resolver produce:
//!     → tracing events with structured fields (instance_id, owner_id, error)
//!     → metrics.rs (request and lookup counters, latency histogram)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, text or JSON)
//!     → Prometheus exporter (only when METRICS_ADDR is set)
//! ```

pub mod logging;
pub mod metrics;
