use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sprintview_core::calendar::HolidayEntry;
use sprintview_core::issues::{extract_assignees, extract_sprints, Issue, Sprint};

use crate::api::shared::{parse_date, ApiQuery, SelectionQuery};
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

const MAX_HOLIDAY_RANGE_DAYS: i64 = 3660;

async fn list_issues(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SelectionQuery>,
) -> ApiResult<Json<Vec<Issue>>> {
    let snapshot = state.snapshot().await;
    Ok(Json(query.filter().apply(&snapshot)))
}

async fn list_sprints(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Sprint>>> {
    let snapshot = state.snapshot().await;
    Ok(Json(extract_sprints(&snapshot)))
}

async fn list_assignees(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let snapshot = state.snapshot().await;
    Ok(Json(extract_assignees(&snapshot)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReloadResponse {
    issue_count: usize,
    source: String,
}

async fn reload_issues(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReloadResponse>> {
    let issue_count = state.reload().await?;
    Ok(Json(ReloadResponse {
        issue_count,
        source: state.issue_supplier.describe(),
    }))
}

#[derive(Deserialize)]
struct HolidayQuery {
    from: Option<String>,
    to: Option<String>,
}

/// Holidays of the configured calendar in `[from, to]`
/// Query params:
///   from, to: YYYY-MM-DD (optional, default to the current year)
async fn list_holidays(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<HolidayQuery>,
) -> ApiResult<Json<Vec<HolidayEntry>>> {
    let settings = state.forecast_service.settings();
    let year = settings.local_date(chrono::Utc::now()).year();

    let from = match query.from.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default(),
    };
    let to = match query.to.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or_default(),
    };

    if to < from {
        return Err(ApiError::BadRequest(format!("'to' ({}) is before 'from' ({})", to, from)));
    }
    if (to - from).num_days() > MAX_HOLIDAY_RANGE_DAYS {
        return Err(ApiError::BadRequest(format!(
            "Range is limited to {} days",
            MAX_HOLIDAY_RANGE_DAYS
        )));
    }

    Ok(Json(state.forecast_service.calendar().holidays_between(from, to)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/issues", get(list_issues))
        .route("/issues/reload", post(reload_issues))
        .route("/sprints", get(list_sprints))
        .route("/assignees", get(list_assignees))
        .route("/holidays", get(list_holidays))
}
