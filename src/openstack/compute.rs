//! Compute (Nova) client: instance → owning user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::openstack::catalog::resource_url;
use crate::openstack::error::CloudError;
use crate::openstack::session::Session;
use crate::resolver::InstanceLookup;

#[derive(Debug, Deserialize)]
struct ServerEnvelope {
    server: ServerRecord,
}

#[derive(Debug, Deserialize)]
struct ServerRecord {
    user_id: String,
}

/// Handle to the compute API.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    session: Arc<Session>,
    endpoint: Url,
}

impl ComputeClient {
    pub fn new(session: Arc<Session>, endpoint: Url) -> Self {
        Self { session, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl InstanceLookup for ComputeClient {
    async fn owner_id(&self, instance_id: &str) -> Result<String, CloudError> {
        let url = resource_url(&self.endpoint, "servers", instance_id)?;
        let envelope: ServerEnvelope = self.session.get_json(url).await?;
        Ok(envelope.server.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_envelope() {
        let envelope: ServerEnvelope = serde_json::from_str(
            r#"{"server": {"id": "xyz321", "name": "vm-1", "user_id": "abc123", "status": "ACTIVE"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.server.user_id, "abc123");
    }

    #[test]
    fn test_server_without_user_is_rejected() {
        let result = serde_json::from_str::<ServerEnvelope>(r#"{"server": {"id": "xyz321"}}"#);
        assert!(result.is_err());
    }
}
