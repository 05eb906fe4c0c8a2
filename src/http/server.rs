//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the routing table with the shared application state
//! - Wrap it with request-ID and trace layers
//! - Serve on a bound listener until shutdown is signalled

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::http::routes::build_routes;
use crate::resolver::UsernameResolver;

/// Application state injected into handlers.
///
/// Built once at startup; handlers only read it.
#[derive(Clone, Debug)]
pub struct AppState {
    pub resolver: UsernameResolver,
}

impl AppState {
    pub fn new(resolver: UsernameResolver) -> Self {
        Self { resolver }
    }
}

/// HTTP server for the username service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        build_routes(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until a message arrives on `shutdown` (or its sender is dropped).
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
