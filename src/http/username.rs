//! Username lookup controller.
//!
//! # Request States
//! ```text
//! Start → ValidateParam ─┬─ missing      → 400 "missing serverID"
//!                        └─ LookupOwner ─┬─ failed → 500 "error fetching server user ID: ..."
//!                                        └─ LookupName ─┬─ failed → 500 "error fetching username: ..."
//!                                                       └─ 200 <display name>
//! ```

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::Response,
};

use crate::http::response::plain_text;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resolver::{LookupRequest, LookupStage};

pub const ROUTE: &str = "/getusername";

pub async fn get_username(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let start = Instant::now();
    let response = lookup(&state, query.as_deref()).await;
    metrics::record_request(ROUTE, response.status().as_u16(), start);
    response
}

async fn lookup(state: &AppState, query: Option<&str>) -> Response {
    let request = match LookupRequest::from_query(query) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejected username lookup without serverID");
            return plain_text(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.resolver.resolve(&request.instance_id).await {
        Ok(resolved) => {
            tracing::debug!(
                instance_id = %request.instance_id,
                owner_id = %resolved.user_id,
                "Resolved username"
            );
            plain_text(StatusCode::OK, resolved.display_name)
        }
        Err(err) => {
            match err.stage {
                LookupStage::Instance => tracing::error!(
                    instance_id = %err.subject,
                    error = %err.source,
                    "Failed to get server details"
                ),
                LookupStage::Identity => tracing::error!(
                    instance_id = %request.instance_id,
                    owner_id = %err.subject,
                    error = %err.source,
                    "Failed to get user details"
                ),
            }
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
