//! Startup orchestration.
//!
//! Wires the components in dependency order: cloud clients, resolver, HTTP
//! server. The listener is bound separately so callers control when traffic
//! starts.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::error::StartupError;
use crate::http::{AppState, HttpServer};
use crate::openstack::{self, CloudClients};
use crate::resolver::UsernameResolver;

/// Build the server from configuration, authenticating with the cloud.
pub async fn bootstrap(config: &ServiceConfig) -> Result<HttpServer, StartupError> {
    let clients =
        openstack::create_clients(&config.cloud.name, config.cloud.clouds_file.as_deref()).await?;
    Ok(server_for(clients))
}

/// Build the server around already-constructed cloud clients.
pub fn server_for(clients: CloudClients) -> HttpServer {
    let resolver = UsernameResolver::new(Arc::new(clients.compute), Arc::new(clients.identity));
    HttpServer::new(AppState::new(resolver))
}

pub async fn bind(config: &ServiceConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.socket_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
