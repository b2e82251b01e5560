use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Tunables of the forecast engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastSettings {
    /// Calendar days looked back when measuring recent throughput
    pub recency_window_days: u32,
    /// Calendar days averaged by the velocity series
    pub trailing_velocity_days: u32,
    /// Days shown past the predicted completion date
    pub display_padding_days: u32,
    /// Days shown past today when no completion date can be predicted
    pub fallback_horizon_days: u32,
    /// Offset used to map timestamps onto calendar days
    pub utc_offset_seconds: i32,
    /// Longest forecast, in working days, still reported as a completion date
    pub max_forecast_working_days: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            recency_window_days: 14,
            trailing_velocity_days: 7,
            display_padding_days: 7,
            fallback_horizon_days: 7,
            utc_offset_seconds: 9 * 3600,
            max_forecast_working_days: 2610,
        }
    }
}

impl ForecastSettings {
    pub fn validate(&self) -> Result<()> {
        if FixedOffset::east_opt(self.utc_offset_seconds).is_none() {
            return Err(ValidationError::InvalidInput(format!(
                "UTC offset {}s is out of range",
                self.utc_offset_seconds
            ))
            .into());
        }
        if self.trailing_velocity_days == 0 {
            return Err(ValidationError::InvalidInput(
                "Trailing velocity window must be at least one day".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// Calendar day of `timestamp` in the configured offset.
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset()).date_naive()
    }
}

/// Scalar statistics of an issue set, recomputed wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintStats {
    pub total_story_points: f64,
    pub completed_story_points: f64,
    pub remaining_story_points: f64,
    /// Percentage, 0 when there is no scope
    pub completion_rate: f64,
    /// All-time story points per calendar day
    pub velocity: f64,
    /// Recent story points per working day
    pub working_day_velocity: f64,
    pub days_elapsed: i64,
    pub working_days_elapsed: u32,
    /// Earliest issue creation day
    pub start_date: NaiveDate,
    /// `None` when no completion can be predicted
    pub predicted_completion_date: Option<NaiveDate>,
    /// `None` when no completion can be predicted
    pub working_day_completion_date: Option<NaiveDate>,
}

/// One day of the burndown/burnup chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurndownPoint {
    pub date: NaiveDate,
    /// Only set on actual days
    pub remaining_story_points: Option<f64>,
    pub completed_story_points: f64,
    /// Story points of every issue created on or before `date`
    pub scope_line: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_day_prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burnup_working_day_prediction: Option<f64>,
    pub is_actual: bool,
    pub is_prediction: bool,
}

/// One day of the velocity chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPoint {
    pub date: NaiveDate,
    #[serde(rename = "completedSP")]
    pub completed_sp: f64,
    #[serde(rename = "cumulativeSP")]
    pub cumulative_sp: f64,
    /// Trailing average per calendar day
    pub velocity: f64,
}

/// Everything a dashboard renders for one issue selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub issue_count: usize,
    pub stats: Option<SprintStats>,
    pub burndown: Vec<BurndownPoint>,
    pub velocity: Vec<VelocityPoint>,
}
