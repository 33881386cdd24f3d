//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::{chat, health, metrics, usage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "copilot-dash API",
        description = "Copilot usage analytics: summary cards, chart series, and a keyword chat over the same data."
    ),
    paths(
        health::health_check,
        metrics::metrics_handler,
        usage::usage_summary,
        usage::usage_series,
        usage::chat_mode_series,
        usage::model_breakdown,
        usage::weekly_usage,
        chat::chat,
    ),
    components(schemas(ErrorResponse, health::HealthResponse)),
    tags(
        (name = "usage", description = "Aggregated Copilot usage over a 7, 14 or 28 day window"),
        (name = "chat", description = "Keyword chat dispatching to the usage reports"),
        (name = "health", description = "Liveness and metrics"),
    )
)]
pub struct ApiDoc;
