//! Request-scoped lookup types.

use std::fmt;

use thiserror::Error;

/// Query-string key carrying the instance ID.
pub const SERVER_ID_PARAM: &str = "serverID";

/// A validated username lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub instance_id: String,
}

/// The request did not carry a usable instance ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing serverID")]
pub struct ValidationError;

impl LookupRequest {
    /// Build a lookup from a raw query string.
    ///
    /// The first `serverID` wins. Only an absent or empty value counts as
    /// missing; whitespace is passed through to compute, which reports it as
    /// not found.
    pub fn from_query(query: Option<&str>) -> Result<Self, ValidationError> {
        let instance_id = query
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == SERVER_ID_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError)?;

        Ok(Self { instance_id })
    }
}

/// Outcome of a successful two-stage lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub user_id: String,
    pub display_name: String,
}

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupStage {
    /// Compute: instance → owner ID.
    Instance,
    /// Identity: owner ID → display name.
    Identity,
}

impl LookupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupStage::Instance => "instance",
            LookupStage::Identity => "identity",
        }
    }

    /// Prefix used in error messages returned to HTTP clients.
    pub fn failure_message(&self) -> &'static str {
        match self {
            LookupStage::Instance => "error fetching server user ID",
            LookupStage::Identity => "error fetching username",
        }
    }
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
