//! Shared utilities for integration tests: an in-process fake OpenStack.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path as UrlPath, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "secret";

/// Fake Keystone + Nova sharing one listener.
pub struct MockCloud {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

struct MockState {
    addr: SocketAddr,
    servers: HashMap<String, String>,
    users: HashMap<String, String>,
    with_compute: bool,
    valid_token: Mutex<String>,
    tokens_issued: AtomicUsize,
    server_gets: AtomicUsize,
}

impl MockCloud {
    /// Start a fake cloud with the given instance → owner and user → name tables.
    pub async fn start(servers: &[(&str, &str)], users: &[(&str, &str)]) -> Self {
        Self::start_with(servers, users, true).await
    }

    /// Start a fake cloud whose catalog has no compute service.
    #[allow(dead_code)]
    pub async fn start_without_compute() -> Self {
        Self::start_with(&[], &[], false).await
    }

    async fn start_with(servers: &[(&str, &str)], users: &[(&str, &str)], with_compute: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        let state = Arc::new(MockState {
            addr,
            servers: to_map(servers),
            users: to_map(users),
            with_compute,
            valid_token: Mutex::new(String::new()),
            tokens_issued: AtomicUsize::new(0),
            server_gets: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/identity/v3/auth/tokens", post(issue_token))
            .route("/identity/v3/users/{id}", get(get_user))
            .route("/compute/v2.1/servers/{id}", get(get_server))
            .with_state(state.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn auth_url(&self) -> String {
        format!("http://{}/identity", self.addr)
    }

    pub fn tokens_issued(&self) -> usize {
        self.state.tokens_issued.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn server_gets(&self) -> usize {
        self.state.server_gets.load(Ordering::SeqCst)
    }

    /// Invalidate the current token so the next API call gets a 401.
    #[allow(dead_code)]
    pub fn expire_tokens(&self) {
        self.state.valid_token.lock().unwrap().clear();
    }

    /// Write a clouds.yaml with a single `openstack` cloud pointing here.
    pub fn write_clouds_yaml(&self, dir: &Path, password: &str) -> PathBuf {
        self.write_clouds_yaml_with(dir, password, "")
    }

    /// Like `write_clouds_yaml`, with extra profile-level YAML lines appended.
    pub fn write_clouds_yaml_with(&self, dir: &Path, password: &str, extra: &str) -> PathBuf {
        let path = dir.join("clouds.yaml");
        let contents = format!(
            "clouds:\n  openstack:\n    auth:\n      auth_url: {}\n      username: svc\n      password: {}\n      user_domain_name: Default\n      project_name: admin\n      project_domain_name: Default\n    region_name: RegionOne\n{}",
            self.auth_url(),
            password,
            extra
        );
        std::fs::write(&path, contents).unwrap();
        path
    }
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let valid = state.valid_token.lock().unwrap();
    !valid.is_empty()
        && headers
            .get("x-auth-token")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|t| t == valid.as_str())
}

async fn issue_token(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let password = &body["auth"]["identity"]["password"]["user"]["password"];
    if password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"code": 401}}))).into_response();
    }

    let n = state.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
    let token = format!("token-{n}");
    *state.valid_token.lock().unwrap() = token.clone();

    let base = format!("http://{}", state.addr);
    let mut catalog = vec![json!({
        "type": "identity",
        "endpoints": [
            {"interface": "public", "region_id": "RegionOne", "url": format!("{base}/identity")}
        ]
    })];
    if state.with_compute {
        catalog.push(json!({
            "type": "compute",
            "endpoints": [
                {"interface": "internal", "region_id": "RegionOne", "url": "http://unreachable.invalid/v2.1"},
                {"interface": "public", "region_id": "RegionOne", "url": format!("{base}/compute/v2.1")}
            ]
        }));
    }

    (
        StatusCode::CREATED,
        [("X-Subject-Token", token)],
        Json(json!({"token": {"catalog": catalog}})),
    )
        .into_response()
}

async fn get_server(
    State(state): State<Arc<MockState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    state.server_gets.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match state.servers.get(&id) {
        Some(user_id) => Json(json!({"server": {"id": id, "user_id": user_id}})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"itemNotFound": {"code": 404, "message": "Instance could not be found."}})),
        )
            .into_response(),
    }
}

async fn get_user(
    State(state): State<Arc<MockState>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&state, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match state.users.get(&id) {
        Some(name) => Json(json!({"user": {"id": id, "name": name}})).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
