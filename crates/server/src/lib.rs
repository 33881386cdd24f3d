// crates/server/src/lib.rs
//! copilot-dash server library.
//!
//! Axum HTTP server exposing Copilot usage aggregates (summary cards,
//! chart series, model breakdown) and a keyword chat over the same data.

pub mod chat;
pub mod config;
pub mod error;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::*;
pub use metrics::init_metrics;
pub use routes::api_routes;
pub use state::AppState;

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use copilot_dash_db::Database;
use copilot_dash_observability::{http_span, request_id_layers};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all API routes and middleware (API only).
pub fn create_app(db: Database) -> Router {
    create_app_full(db, None)
}

/// Create the Axum application, optionally serving the frontend bundle.
///
/// This sets up:
/// - API routes under `/api`
/// - Swagger UI at `/api/docs` (with the `swagger` feature)
/// - SPA fallback to `index.html` when `static_dir` is set
/// - CORS, request ids, and request tracing
pub fn create_app_full(db: Database, static_dir: Option<PathBuf>) -> Router {
    let state = AppState::new(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().merge(api_routes(state));

    #[cfg(feature = "swagger")]
    {
        use utoipa_swagger_ui::{Config, SwaggerUi};
        app = app.merge(SwaggerUi::new("/api/docs").config(Config::from("/api/openapi.json")));
    }

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        tracing::info!(static_dir = %dir.display(), "Serving frontend bundle");
        let spa = ServeDir::new(&dir).fallback(ServeFile::new(index));
        app = app.fallback(move |request: Request<Body>| frontend_fallback(spa.clone(), request));
    }

    let (set_request_id, propagate_request_id) = request_id_layers();

    app.layer(
        ServiceBuilder::new()
            .layer(set_request_id)
            .layer(TraceLayer::new_for_http().make_span_with(http_span::<Body>))
            .layer(propagate_request_id)
            .layer(cors),
    )
}

/// Serve the frontend bundle. Unknown `/api` paths stay a JSON 404.
async fn frontend_fallback(spa: ServeDir<ServeFile>, request: Request<Body>) -> Response {
    if request.uri().path().starts_with("/api") {
        return (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))).into_response();
    }
    match spa.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
