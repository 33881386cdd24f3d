//! Chat endpoint.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use copilot_dash_core::{ChatRequest, ChatResponse};

use crate::error::{ApiResult, ErrorResponse};
use crate::metrics::record_chat_intent;
use crate::state::AppState;

/// POST /api/chat - Answer a free-text question about the dashboard.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer with supporting data", body = ChatResponse),
        (status = 400, description = "Empty message, invalid timeframe, or malformed body", body = ErrorResponse),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = body?;
    let response = crate::chat::answer(&state.db, &request).await?;
    record_chat_intent(response.intent);
    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}
