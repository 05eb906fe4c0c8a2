//! Fixed routing table.
//!
//! New endpoints are added here; there is no dynamic discovery.

use axum::{
    routing::{any, get},
    Router,
};

use crate::http::server::AppState;
use crate::http::{health, username};

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route(health::ROUTE, any(health::health))
        .route(username::ROUTE, get(username::get_username))
        .with_state(state)
}
