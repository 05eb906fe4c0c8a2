//! clouds.yaml parsing.
//!
//! # Responsibilities
//! - Locate clouds.yaml (explicit path or standard search path)
//! - Select the named cloud profile
//! - Turn the profile into auth, endpoint and TLS settings
//!
//! # Design Decisions
//! - Only Keystone v3 password and application-credential auth are supported
//! - Every problem with the file or profile is a `ConfigError`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::config::ConfigError;

#[derive(Debug, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudProfile>,
}

/// One entry under `clouds:`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudProfile {
    #[serde(default)]
    pub auth: AuthSection,
    pub auth_type: Option<String>,
    pub region_name: Option<String>,
    pub interface: Option<String>,
    #[serde(default = "default_verify")]
    pub verify: bool,
    pub cacert: Option<PathBuf>,
}

fn default_verify() -> bool {
    true
}

/// The `auth:` block of a cloud profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSection {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub user_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub project_domain_id: Option<String>,
    /// Fallback for both user and project domain.
    pub domain_name: Option<String>,
    pub domain_id: Option<String>,
    pub application_credential_id: Option<String>,
    pub application_credential_secret: Option<String>,
}

/// A domain reference as Keystone accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    Id(String),
    Name(String),
}

/// A user or project, by ID or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Id(String),
    Name { name: String, domain: Domain },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Password {
        user: Identifier,
        password: String,
        project: Option<Identifier>,
    },
    ApplicationCredential {
        id: String,
        secret: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub verify: bool,
    pub ca_cert: Option<PathBuf>,
}

/// Everything needed to authenticate and find service endpoints.
#[derive(Debug, Clone)]
pub struct CloudSettings {
    pub cloud: String,
    pub auth_url: Url,
    pub credentials: Credentials,
    pub region: Option<String>,
    /// Catalog interface, e.g. "public".
    pub interface: String,
    pub tls: TlsSettings,
}

/// Load the named cloud from clouds.yaml.
pub fn load(cloud: &str, explicit: Option<&Path>) -> Result<CloudSettings, ConfigError> {
    let path = locate(explicit)?;
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::CloudsFileRead {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), cloud = %cloud, "Reading cloud configuration");
    parse(&contents, &path, cloud)
}

/// Candidate clouds.yaml locations, in priority order.
pub fn search_path() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("clouds.yaml")];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".config/openstack/clouds.yaml"));
    }
    paths.push(PathBuf::from("/etc/openstack/clouds.yaml"));
    paths
}

fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let candidates = search_path();
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::CloudsFileNotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Parse clouds.yaml contents and resolve the named cloud.
pub fn parse(contents: &str, path: &Path, cloud: &str) -> Result<CloudSettings, ConfigError> {
    let file: CloudsFile =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::CloudsFileParse {
            path: path.to_path_buf(),
            source,
        })?;

    let profile = file
        .clouds
        .get(cloud)
        .ok_or_else(|| ConfigError::UnknownCloud(cloud.to_string()))?;

    resolve(cloud, profile)
}

fn resolve(cloud: &str, profile: &CloudProfile) -> Result<CloudSettings, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidCloud {
        cloud: cloud.to_string(),
        reason: reason.to_string(),
    };

    let auth = &profile.auth;
    let raw_url = auth
        .auth_url
        .as_deref()
        .ok_or_else(|| invalid("auth.auth_url is required"))?;
    let auth_url = Url::parse(raw_url).map_err(|e| invalid(&format!("auth.auth_url: {e}")))?;
    if auth_url.cannot_be_a_base() {
        return Err(invalid("auth.auth_url must be an http(s) URL"));
    }

    let credentials = match profile.auth_type.as_deref().unwrap_or("password") {
        "password" | "v3password" => password_credentials(auth).map_err(|r| invalid(&r))?,
        "v3applicationcredential" | "application_credential" => {
            match (
                &auth.application_credential_id,
                &auth.application_credential_secret,
            ) {
                (Some(id), Some(secret)) => Credentials::ApplicationCredential {
                    id: id.clone(),
                    secret: secret.clone(),
                },
                _ => {
                    return Err(invalid(
                        "application_credential_id and application_credential_secret are required",
                    ))
                }
            }
        }
        other => return Err(invalid(&format!("unsupported auth_type {other:?}"))),
    };

    let interface = profile
        .interface
        .as_deref()
        .unwrap_or("public")
        .trim_end_matches("URL")
        .to_string();

    Ok(CloudSettings {
        cloud: cloud.to_string(),
        auth_url,
        credentials,
        region: profile.region_name.clone(),
        interface,
        tls: TlsSettings {
            verify: profile.verify,
            ca_cert: profile.cacert.clone(),
        },
    })
}

fn password_credentials(auth: &AuthSection) -> Result<Credentials, String> {
    let password = auth
        .password
        .clone()
        .ok_or_else(|| "auth.password is required".to_string())?;

    let user_domain = domain(
        &auth.user_domain_id,
        &auth.user_domain_name,
        &auth.domain_id,
        &auth.domain_name,
    );
    let user = match (&auth.user_id, &auth.username) {
        (Some(id), _) => Identifier::Id(id.clone()),
        (None, Some(name)) => Identifier::Name {
            name: name.clone(),
            domain: user_domain.ok_or_else(|| {
                "auth.user_domain_name or auth.user_domain_id is required with auth.username"
                    .to_string()
            })?,
        },
        (None, None) => return Err("auth.username or auth.user_id is required".to_string()),
    };

    let project_domain = domain(
        &auth.project_domain_id,
        &auth.project_domain_name,
        &auth.domain_id,
        &auth.domain_name,
    );
    let project = match (&auth.project_id, &auth.project_name) {
        (Some(id), _) => Some(Identifier::Id(id.clone())),
        (None, Some(name)) => Some(Identifier::Name {
            name: name.clone(),
            domain: project_domain.ok_or_else(|| {
                "auth.project_domain_name or auth.project_domain_id is required with auth.project_name"
                    .to_string()
            })?,
        }),
        (None, None) => None,
    };

    Ok(Credentials::Password {
        user,
        password,
        project,
    })
}

fn domain(
    id: &Option<String>,
    name: &Option<String>,
    fallback_id: &Option<String>,
    fallback_name: &Option<String>,
) -> Option<Domain> {
    id.clone()
        .map(Domain::Id)
        .or_else(|| name.clone().map(Domain::Name))
        .or_else(|| fallback_id.clone().map(Domain::Id))
        .or_else(|| fallback_name.clone().map(Domain::Name))
}
