//! Identity (Keystone) client: user → display name.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::openstack::catalog::resource_url;
use crate::openstack::error::CloudError;
use crate::openstack::session::Session;
use crate::resolver::UserLookup;

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    name: String,
}

/// Handle to the identity v3 API.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    session: Arc<Session>,
    endpoint: Url,
}

impl IdentityClient {
    pub fn new(session: Arc<Session>, endpoint: Url) -> Self {
        Self { session, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserLookup for IdentityClient {
    async fn display_name(&self, user_id: &str) -> Result<String, CloudError> {
        let url = resource_url(&self.endpoint, "users", user_id)?;
        let envelope: UserEnvelope = self.session.get_json(url).await?;
        Ok(envelope.user.name)
    }
}
