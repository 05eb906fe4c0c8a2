//! Username service.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │               USERNAME SERVICE                │
//!                   │                                               │
//!  GET /getusername │  ┌────────┐   ┌──────────┐   ┌────────────┐   │
//!  ─────────────────┼─▶│ routes │──▶│ username │──▶│  resolver  │   │
//!                   │  └────────┘   │controller│   └─────┬──────┘   │
//!  GET /health      │      │        └──────────┘         │          │
//!  ─────────────────┼──────┘ health                ┌─────┴──────┐   │     ┌──────────┐
//!                   │                              │  compute   │───┼────▶│   Nova   │
//!                   │                              │  identity  │───┼────▶│ Keystone │
//!                   │                              └────────────┘   │     └──────────┘
//!                   └───────────────────────────────────────────────┘
//! ```

use username_service::config::{self, ObservabilityConfig};
use username_service::lifecycle::{signals, startup, Shutdown};
use username_service::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "username-service starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        cloud = %config.cloud.name,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        // Validation already checked this parses.
        if let Ok(addr) = addr.parse() {
            metrics::init_metrics(addr);
        }
    }

    let server = match startup::bootstrap(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, cloud = %config.cloud.name, "Failed to initialise cloud clients");
            return Err(e.into());
        }
    };

    let listener = match startup::bind(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
