//! Dashboard usage endpoints: summary cards, chart series, model breakdown.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use copilot_dash_core::{
    ChartDataPoint, DashboardSummary, ModelUsageTotal, StackedChartDataPoint, Timeframe,
    UsageMetric, WeeklyUsage,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{ApiError, ApiResult, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimeframeQuery {
    /// One of "7", "14", "28". Defaults to "28".
    pub timeframe: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesQuery {
    /// activeUsers, totalSuggestions, acceptedSuggestions, acceptanceRate,
    /// chatRequests, agentRequests, agentUsers or agentAdoption.
    pub metric: Option<String>,
    /// One of "7", "14", "28". Defaults to "28".
    pub timeframe: Option<String>,
}

/// GET /api/usage - Summary cards for the dashboard.
#[utoipa::path(
    get,
    path = "/api/usage",
    tag = "usage",
    params(TimeframeQuery),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 400, description = "Invalid timeframe", body = ErrorResponse),
    )
)]
pub async fn usage_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TimeframeQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardSummary>> {
    let Query(query) = query?;
    let timeframe = Timeframe::from_param(query.timeframe.as_deref())?;
    Ok(Json(state.db.get_usage_summary(timeframe).await?))
}

/// GET /api/usage/series - Chronological points for one metric.
#[utoipa::path(
    get,
    path = "/api/usage/series",
    tag = "usage",
    params(SeriesQuery),
    responses(
        (status = 200, description = "Chart series", body = Vec<ChartDataPoint>),
        (status = 400, description = "Missing or unknown metric, or invalid timeframe", body = ErrorResponse),
    )
)]
pub async fn usage_series(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SeriesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ChartDataPoint>>> {
    let Query(query) = query?;
    let metric: UsageMetric = query
        .metric
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("metric is required".to_string()))?
        .parse()?;
    let timeframe = Timeframe::from_param(query.timeframe.as_deref())?;
    Ok(Json(state.db.get_usage_series(metric, timeframe).await?))
}

/// GET /api/usage/chat-modes - Per-day chat requests split by mode.
#[utoipa::path(
    get,
    path = "/api/usage/chat-modes",
    tag = "usage",
    params(TimeframeQuery),
    responses(
        (status = 200, description = "Stacked chat-mode series", body = Vec<StackedChartDataPoint>),
        (status = 400, description = "Invalid timeframe", body = ErrorResponse),
    )
)]
pub async fn chat_mode_series(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TimeframeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<StackedChartDataPoint>>> {
    let Query(query) = query?;
    let timeframe = Timeframe::from_param(query.timeframe.as_deref())?;
    Ok(Json(state.db.get_chat_mode_series(timeframe).await?))
}

/// GET /api/usage/models - Requests per model, most used first.
#[utoipa::path(
    get,
    path = "/api/usage/models",
    tag = "usage",
    params(TimeframeQuery),
    responses(
        (status = 200, description = "Model breakdown", body = Vec<ModelUsageTotal>),
        (status = 400, description = "Invalid timeframe", body = ErrorResponse),
    )
)]
pub async fn model_breakdown(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TimeframeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ModelUsageTotal>>> {
    let Query(query) = query?;
    let timeframe = Timeframe::from_param(query.timeframe.as_deref())?;
    Ok(Json(state.db.get_model_breakdown(timeframe).await?))
}

/// GET /api/usage/weekly - Weekly rows covering the timeframe.
#[utoipa::path(
    get,
    path = "/api/usage/weekly",
    tag = "usage",
    params(TimeframeQuery),
    responses(
        (status = 200, description = "Weekly usage", body = Vec<WeeklyUsage>),
        (status = 400, description = "Invalid timeframe", body = ErrorResponse),
    )
)]
pub async fn weekly_usage(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TimeframeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<WeeklyUsage>>> {
    let Query(query) = query?;
    let timeframe = Timeframe::from_param(query.timeframe.as_deref())?;
    Ok(Json(state.db.get_weekly_usage(timeframe).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usage", get(usage_summary))
        .route("/usage/series", get(usage_series))
        .route("/usage/chat-modes", get(chat_mode_series))
        .route("/usage/models", get(model_breakdown))
        .route("/usage/weekly", get(weekly_usage))
}
