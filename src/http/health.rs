//! Liveness endpoint.

use std::time::Instant;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::observability::metrics;

pub const ROUTE: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Always 200 `{"status":"ok"}`, whatever the request looks like.
pub async fn health() -> Response {
    let start = Instant::now();
    let response = Json(HealthStatus { status: "ok" }).into_response();
    metrics::record_request(ROUTE, response.status().as_u16(), start);
    response
}
