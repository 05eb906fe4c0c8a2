//! Username resolution.
//!
//! # Data Flow
//! ```text
//! instance ID
//!     → InstanceLookup::owner_id     (stage: instance)
//!     → UserLookup::display_name     (stage: identity)
//!     → ResolvedUser
//! ```
//!
//! # Design Decisions
//! - The two stages are strictly sequential; the second needs the first's output
//! - Lookups are traits so tests inject fakes instead of patching globals
//! - Nothing is cached; every request performs both remote calls

pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use types::{LookupRequest, LookupStage, ResolvedUser, ValidationError, SERVER_ID_PARAM};

use crate::observability::metrics;
use crate::openstack::CloudError;

/// Finds the user that owns a compute instance.
#[async_trait]
pub trait InstanceLookup: Send + Sync {
    async fn owner_id(&self, instance_id: &str) -> Result<String, CloudError>;
}

/// Finds the display name of an identity-service user.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn display_name(&self, user_id: &str) -> Result<String, CloudError>;
}

/// A remote lookup failed.
///
/// `subject` is the ID that was being looked up at `stage`.
#[derive(Debug, Error)]
#[error("{}: {source}", .stage.failure_message())]
pub struct LookupError {
    pub stage: LookupStage,
    pub subject: String,
    #[source]
    pub source: CloudError,
}

/// Two-hop instance → owner → display name resolver.
#[derive(Clone)]
pub struct UsernameResolver {
    instances: Arc<dyn InstanceLookup>,
    users: Arc<dyn UserLookup>,
}

impl UsernameResolver {
    pub fn new(instances: Arc<dyn InstanceLookup>, users: Arc<dyn UserLookup>) -> Self {
        Self { instances, users }
    }

    /// Stage one: the owning user's ID.
    pub async fn owner_id(&self, instance_id: &str) -> Result<String, LookupError> {
        let result = self.instances.owner_id(instance_id).await;
        metrics::record_lookup(LookupStage::Instance, result.is_ok());
        result.map_err(|source| LookupError {
            stage: LookupStage::Instance,
            subject: instance_id.to_string(),
            source,
        })
    }

    /// Stage two: the user's display name.
    pub async fn display_name(&self, owner_id: &str) -> Result<String, LookupError> {
        let result = self.users.display_name(owner_id).await;
        metrics::record_lookup(LookupStage::Identity, result.is_ok());
        result.map_err(|source| LookupError {
            stage: LookupStage::Identity,
            subject: owner_id.to_string(),
            source,
        })
    }

    /// Run both stages, stopping at the first failure.
    pub async fn resolve(&self, instance_id: &str) -> Result<ResolvedUser, LookupError> {
        let user_id = self.owner_id(instance_id).await?;
        let display_name = self.display_name(&user_id).await?;
        Ok(ResolvedUser {
            user_id,
            display_name,
        })
    }
}

impl std::fmt::Debug for UsernameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsernameResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory lookups shared by resolver and handler tests.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct FakeDirectory {
        entries: HashMap<String, String>,
        calls: AtomicUsize,
    }

    impl FakeDirectory {
        pub fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn get(&self, kind: &str, id: &str) -> Result<String, CloudError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entries
                .get(id)
                .cloned()
                .ok_or_else(|| CloudError::NotFound {
                    url: format!("fake://{kind}/{id}"),
                })
        }
    }

    #[async_trait]
    impl InstanceLookup for FakeDirectory {
        async fn owner_id(&self, instance_id: &str) -> Result<String, CloudError> {
            self.get("servers", instance_id)
        }
    }

    #[async_trait]
    impl UserLookup for FakeDirectory {
        async fn display_name(&self, user_id: &str) -> Result<String, CloudError> {
            self.get("users", user_id)
        }
    }
}
