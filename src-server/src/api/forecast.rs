use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sprintview_core::forecast::{burndown_to_csv, velocity_to_csv, DashboardSnapshot};
use sprintview_core::issues::{validate_issues, Issue, IssueFilter};

use crate::api::shared::{resolve_now, ApiJson, ApiQuery, SelectionQuery};
use crate::error::ApiResult;
use crate::main_lib::AppState;

/// Dashboard for the loaded snapshot
/// Query params:
///   assignee, sprint, label: selection (optional, "all" matches everything)
///   date: YYYY-MM-DD reference day (optional, defaults to today)
async fn get_forecast(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> ApiResult<Json<DashboardSnapshot>> {
    Ok(Json(dashboard_for(&state, &query).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastRequest {
    issues: Vec<Issue>,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
    #[serde(default)]
    filter: IssueFilter,
}

/// Dashboard for an ad-hoc issue list posted by the caller
async fn post_forecast(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ForecastRequest>,
) -> ApiResult<Json<DashboardSnapshot>> {
    validate_issues(&request.issues)?;
    let now = request.now.unwrap_or_else(Utc::now);
    let dashboard = state
        .forecast_service
        .build_dashboard(&request.issues, &request.filter, now);
    Ok(Json(dashboard))
}

async fn get_burndown_csv(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> ApiResult<impl IntoResponse> {
    let dashboard = dashboard_for(&state, &query).await?;
    let body = burndown_to_csv(&dashboard.burndown)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

async fn get_velocity_csv(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> ApiResult<impl IntoResponse> {
    let dashboard = dashboard_for(&state, &query).await?;
    let body = velocity_to_csv(&dashboard.velocity)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

async fn dashboard_for(state: &AppState, query: &SelectionQuery) -> ApiResult<DashboardSnapshot> {
    let now = resolve_now(query.date.as_deref(), state.forecast_service.settings())?;
    let snapshot = state.snapshot().await;
    let dashboard = state
        .forecast_service
        .build_dashboard(&snapshot, &query.filter(), now);
    tracing::debug!(
        issues = dashboard.issue_count,
        points = dashboard.burndown.len(),
        as_of = %dashboard.as_of,
        "forecast computed"
    );
    Ok(dashboard)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forecast", get(get_forecast).post(post_forecast))
        .route("/forecast/burndown.csv", get(get_burndown_csv))
        .route("/forecast/velocity.csv", get(get_velocity_csv))
}
