use axum::extract::{FromRequest, FromRequestParts};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sprintview_core::forecast::ForecastSettings;
use sprintview_core::issues::IssueFilter;

use crate::error::{ApiError, ApiResult};

/// `Json` whose rejections answer with the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections answer with the API error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Selection and reference-date query parameters shared by read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub assignee: Option<String>,
    pub sprint: Option<String>,
    pub label: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

impl SelectionQuery {
    pub fn filter(&self) -> IssueFilter {
        IssueFilter {
            assignee: self.assignee.clone(),
            sprint: self.sprint.clone(),
            label: self.label.clone(),
        }
    }
}

pub fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw)))
}

/// "Now" for a request: the last second of `date` in the configured offset,
/// or the wall clock when no date is given.
pub fn resolve_now(date: Option<&str>, settings: &ForecastSettings) -> ApiResult<DateTime<Utc>> {
    let Some(raw) = date else {
        return Ok(Utc::now());
    };
    let day = parse_date(raw)?;
    day.and_hms_opt(23, 59, 59)
        .and_then(|end_of_day| end_of_day.and_local_timezone(settings.offset()).single())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| ApiError::BadRequest(format!("Date '{}' is out of range", raw)))
}
