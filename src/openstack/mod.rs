//! OpenStack API access.
//!
//! # Data Flow
//! ```text
//! cloud name + clouds.yaml
//!     → clouds.rs (profile → auth/endpoint/TLS settings)
//!     → build reqwest client with TLS settings
//!     → session.rs (Keystone token + service catalog)
//!     → catalog.rs (compute and identity endpoint URLs)
//!     → CloudClients { compute.rs, identity.rs }
//! ```
//!
//! # Design Decisions
//! - Clients are created once at startup and shared read-only
//! - Both clients share one session, so one token serves both APIs
//! - Startup fails on any error; there is no partial operation mode

pub mod catalog;
pub mod clouds;
pub mod compute;
pub mod error;
pub mod identity;
pub mod session;

use std::path::Path;
use std::sync::Arc;

pub use clouds::CloudSettings;
pub use compute::ComputeClient;
pub use error::{CloudError, ConnectionError};
pub use identity::IdentityClient;
pub use session::Session;

use crate::error::StartupError;
use crate::openstack::catalog::with_version;
use crate::openstack::clouds::TlsSettings;

/// The two service clients the resolver needs.
#[derive(Debug, Clone)]
pub struct CloudClients {
    pub compute: ComputeClient,
    pub identity: IdentityClient,
}

/// Build compute and identity clients for the named cloud.
pub async fn create_clients(
    cloud: &str,
    clouds_file: Option<&Path>,
) -> Result<CloudClients, StartupError> {
    let settings = clouds::load(cloud, clouds_file)?;
    Ok(connect(&settings).await?)
}

/// Authenticate with already-resolved settings and build the clients.
pub async fn connect(settings: &CloudSettings) -> Result<CloudClients, ConnectionError> {
    let http = build_http_client(&settings.tls)?;
    let session = Arc::new(Session::authenticate(http, settings).await?);

    let region = settings.region.as_deref();
    let compute = session.endpoint("compute", &settings.interface, region)?;
    let identity = with_version(
        session.endpoint("identity", &settings.interface, region)?,
        "v3",
    );

    tracing::info!(
        compute = %compute,
        identity = %identity,
        "Cloud clients ready"
    );

    Ok(CloudClients {
        compute: ComputeClient::new(session.clone(), compute),
        identity: IdentityClient::new(session, identity),
    })
}

fn build_http_client(tls: &TlsSettings) -> Result<reqwest::Client, ConnectionError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if !tls.verify {
        tracing::warn!("TLS certificate verification disabled for cloud API");
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &tls.ca_cert {
        let pem = std::fs::read(path).map_err(|source| ConnectionError::CaCertRead {
            path: path.clone(),
            source,
        })?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(|source| {
            ConnectionError::CaCertParse {
                path: path.clone(),
                source,
            }
        })?;
        builder = builder.add_root_certificate(cert);
    }

    builder.build().map_err(ConnectionError::HttpClient)
}
