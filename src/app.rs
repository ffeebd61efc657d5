use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::config::DiscoverySettings;
use crate::fetch::store::SnapshotStore;
use crate::notifications::feed::NotificationFeed;
use crate::search::engine::SearchEngine;

/// Shared state of the HTTP API.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub engine: Arc<SearchEngine>,
    pub discovery: DiscoverySettings,
    pub feed: Arc<NotificationFeed>,
}

/// All API routes, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/search",
            get(crate::api::search::search_handler),
        )
        .route(
            "/api/v1/search/facets",
            get(crate::api::search::facets_handler),
        )
        .route(
            "/api/v1/discover",
            get(crate::api::search::discover_handler),
        )
        .route(
            "/api/v1/snapshot/refresh",
            post(crate::api::search::refresh_handler),
        )
        .route(
            "/api/v1/notifications",
            get(crate::api::notifications::inbox_handler),
        )
        .route(
            "/api/v1/notifications/read",
            post(crate::api::notifications::mark_all_read_handler),
        )
        .with_state(state)
}
