//! API route handlers for the copilot-dash server.

pub mod chat;
pub mod docs;
pub mod health;
pub mod metrics;
pub mod usage;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::metrics::track_requests;
use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - GET  /api/usage - Dashboard summary cards
/// - GET  /api/usage/series - Chart series for one metric
/// - GET  /api/usage/chat-modes - Stacked chat-mode series
/// - GET  /api/usage/models - Requests per model
/// - GET  /api/usage/weekly - Weekly usage rows
/// - POST /api/chat - Keyword chat over the dashboard data
/// - GET  /api/metrics - Prometheus metrics
/// - GET  /api/openapi.json - OpenAPI document
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", usage::router())
        .nest("/api", chat::router())
        .nest("/api", metrics::router())
        .nest("/api", docs::router())
        .route_layer(middleware::from_fn(track_requests))
        .with_state(state)
}
