//! Authenticated Keystone v3 session.
//!
//! # Responsibilities
//! - Issue a token from the configured credentials
//! - Expose the service catalog that came with the token
//! - Perform authenticated GETs, re-authenticating once on HTTP 401
//!
//! # Design Decisions
//! - The current token lives in an `ArcSwap`; request paths never lock
//! - Re-authentication is serialised so concurrent 401s share one new token
//! - No retries other than the single replay after re-authentication

use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use url::Url;

use crate::openstack::catalog::{find_endpoint, join_segments, with_version, CatalogEntry};
use crate::openstack::clouds::{CloudSettings, Credentials, Domain, Identifier};
use crate::openstack::error::{CloudError, ConnectionError};

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Longest error body kept in `CloudError::Status`.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug)]
struct Token {
    value: String,
    catalog: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

/// Shared, authenticated connection to one cloud.
pub struct Session {
    http: Client,
    tokens_url: Url,
    auth_body: Value,
    token: ArcSwap<Token>,
    reauth: Mutex<()>,
}

impl Session {
    /// Authenticate against Keystone and return a ready session.
    pub async fn authenticate(http: Client, settings: &CloudSettings) -> Result<Self, ConnectionError> {
        let tokens_url = join_segments(&with_version(settings.auth_url.clone(), "v3"), &["auth", "tokens"]);
        let auth_body = auth_request_body(&settings.credentials);

        let token = issue_token(&http, &tokens_url, &auth_body)
            .await
            .map_err(ConnectionError::Auth)?;

        tracing::info!(
            cloud = %settings.cloud,
            auth_url = %settings.auth_url,
            services = token.catalog.len(),
            "Authenticated with identity service"
        );

        Ok(Self {
            http,
            tokens_url,
            auth_body,
            token: ArcSwap::from_pointee(token),
            reauth: Mutex::new(()),
        })
    }

    /// Resolve a service endpoint from the current token's catalog.
    pub fn endpoint(
        &self,
        service_type: &str,
        interface: &str,
        region: Option<&str>,
    ) -> Result<Url, ConnectionError> {
        let token = self.token.load();
        let raw = find_endpoint(&token.catalog, service_type, interface, region).ok_or_else(|| {
            ConnectionError::MissingEndpoint {
                service: service_type.to_string(),
                interface: interface.to_string(),
            }
        })?;

        let url = Url::parse(raw).map_err(|e| ConnectionError::InvalidEndpoint {
            service: service_type.to_string(),
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConnectionError::InvalidEndpoint {
                service: service_type.to_string(),
                url: raw.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(url)
    }

    /// GET a JSON document with the current token.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CloudError> {
        let token = self.token.load_full();
        let mut response = self.send_get(&url, &token.value).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(url = %url, "Token rejected, re-authenticating");
            let fresh = self.reauthenticate(&token).await?;
            response = self.send_get(&url, &fresh.value).await?;
        }

        decode(&url, response).await
    }

    async fn send_get(&self, url: &Url, token: &str) -> Result<Response, CloudError> {
        self.http
            .get(url.clone())
            .header(AUTH_TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| CloudError::Transport {
                url: url.to_string(),
                source,
            })
    }

    /// Replace `stale` with a freshly issued token.
    ///
    /// If another request already replaced it, that token is reused.
    async fn reauthenticate(&self, stale: &Arc<Token>) -> Result<Arc<Token>, CloudError> {
        let _guard = self.reauth.lock().await;

        let current = self.token.load_full();
        if !Arc::ptr_eq(&current, stale) {
            return Ok(current);
        }

        let fresh = Arc::new(issue_token(&self.http, &self.tokens_url, &self.auth_body).await?);
        self.token.store(fresh.clone());
        tracing::debug!("Token refreshed");
        Ok(fresh)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tokens_url", &self.tokens_url.as_str())
            .finish()
    }
}

async fn issue_token(http: &Client, tokens_url: &Url, body: &Value) -> Result<Token, CloudError> {
    let response = http
        .post(tokens_url.clone())
        .json(body)
        .send()
        .await
        .map_err(|source| CloudError::Transport {
            url: tokens_url.to_string(),
            source,
        })?;

    let value = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let parsed: TokenResponse = decode(tokens_url, response).await?;
    let value = value.ok_or_else(|| CloudError::Decode {
        url: tokens_url.to_string(),
        reason: format!("missing {SUBJECT_TOKEN_HEADER} header"),
    })?;

    Ok(Token {
        value,
        catalog: parsed.token.catalog,
    })
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, CloudError> {
    let status = response.status();
    let body = response.bytes().await.map_err(|source| CloudError::Transport {
        url: url.to_string(),
        source,
    })?;

    if status == StatusCode::NOT_FOUND {
        return Err(CloudError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        let mut text = String::from_utf8_lossy(&body).into_owned();
        if text.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        return Err(CloudError::Status {
            url: url.to_string(),
            status,
            body: text,
        });
    }

    serde_json::from_slice(&body).map_err(|e| CloudError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn domain_json(domain: &Domain) -> Value {
    match domain {
        Domain::Id(id) => json!({ "id": id }),
        Domain::Name(name) => json!({ "name": name }),
    }
}

fn identifier_json(identifier: &Identifier) -> Value {
    match identifier {
        Identifier::Id(id) => json!({ "id": id }),
        Identifier::Name { name, domain } => json!({ "name": name, "domain": domain_json(domain) }),
    }
}

/// Keystone v3 `POST /auth/tokens` request body.
pub fn auth_request_body(credentials: &Credentials) -> Value {
    match credentials {
        Credentials::Password {
            user,
            password,
            project,
        } => {
            let mut user_json = identifier_json(user);
            user_json["password"] = json!(password);

            let mut body = json!({
                "auth": {
                    "identity": {
                        "methods": ["password"],
                        "password": { "user": user_json }
                    }
                }
            });
            if let Some(project) = project {
                body["auth"]["scope"] = json!({ "project": identifier_json(project) });
            }
            body
        }
        Credentials::ApplicationCredential { id, secret } => json!({
            "auth": {
                "identity": {
                    "methods": ["application_credential"],
                    "application_credential": { "id": id, "secret": secret }
                }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_body_with_project_scope() {
        let body = auth_request_body(&Credentials::Password {
            user: Identifier::Name {
                name: "svc".to_string(),
                domain: Domain::Name("Default".to_string()),
            },
            password: "pw".to_string(),
            project: Some(Identifier::Id("p-1".to_string())),
        });

        assert_eq!(body["auth"]["identity"]["methods"], json!(["password"]));
        assert_eq!(
            body["auth"]["identity"]["password"]["user"],
            json!({ "name": "svc", "domain": { "name": "Default" }, "password": "pw" })
        );
        assert_eq!(body["auth"]["scope"], json!({ "project": { "id": "p-1" } }));
    }

    #[test]
    fn test_password_body_unscoped() {
        let body = auth_request_body(&Credentials::Password {
            user: Identifier::Id("u-1".to_string()),
            password: "pw".to_string(),
            project: None,
        });
        assert!(body["auth"].get("scope").is_none());
    }

    #[test]
    fn test_application_credential_body() {
        let body = auth_request_body(&Credentials::ApplicationCredential {
            id: "ac".to_string(),
            secret: "s".to_string(),
        });
        assert_eq!(
            body["auth"]["identity"],
            json!({
                "methods": ["application_credential"],
                "application_credential": { "id": "ac", "secret": "s" }
            })
        );
    }
}
