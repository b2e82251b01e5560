use chrono::{DateTime, Utc};

use crate::calendar::WorkingDayCalendar;
use crate::forecast::burndown::build_burndown;
use crate::forecast::forecast_model::{
    BurndownPoint, DashboardSnapshot, ForecastSettings, SprintStats, VelocityPoint,
};
use crate::forecast::sprint_stats::{compute_sprint_stats, series_start};
use crate::forecast::velocity::build_velocity_series;
use crate::issues::{Issue, IssueFilter};

/// Entry point of the forecast engine.
///
/// Holds no state besides its configuration: every call derives its output
/// from the issue slice and `now` it is given.
#[derive(Debug, Clone, Default)]
pub struct ForecastService {
    calendar: WorkingDayCalendar,
    settings: ForecastSettings,
}

impl ForecastService {
    pub fn new(calendar: WorkingDayCalendar, settings: ForecastSettings) -> Self {
        ForecastService { calendar, settings }
    }

    pub fn calendar(&self) -> &WorkingDayCalendar {
        &self.calendar
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn sprint_stats(&self, issues: &[Issue], now: DateTime<Utc>) -> Option<SprintStats> {
        compute_sprint_stats(issues, now, &self.calendar, &self.settings)
    }

    pub fn burndown(
        &self,
        issues: &[Issue],
        stats: &SprintStats,
        now: DateTime<Utc>,
    ) -> Vec<BurndownPoint> {
        build_burndown(
            issues,
            stats,
            stats.start_date,
            now,
            &self.calendar,
            &self.settings,
        )
    }

    pub fn velocity(&self, issues: &[Issue], now: DateTime<Utc>) -> Vec<VelocityPoint> {
        if issues.is_empty() {
            return Vec::new();
        }
        let start = series_start(issues, now, &self.settings);
        build_velocity_series(issues, start, now, &self.settings)
    }

    /// Filter the snapshot and derive stats plus both series.
    pub fn build_dashboard(
        &self,
        issues: &[Issue],
        filter: &IssueFilter,
        now: DateTime<Utc>,
    ) -> DashboardSnapshot {
        let selected = if filter.is_unfiltered() {
            issues.to_vec()
        } else {
            filter.apply(issues)
        };
        let as_of = self.settings.local_date(now);

        let Some(stats) = self.sprint_stats(&selected, now) else {
            log::debug!("No issues match {:?}, returning empty dashboard", filter);
            return DashboardSnapshot {
                as_of,
                issue_count: 0,
                stats: None,
                burndown: Vec::new(),
                velocity: Vec::new(),
            };
        };

        let burndown = self.burndown(&selected, &stats, now);
        let velocity = self.velocity(&selected, now);

        DashboardSnapshot {
            as_of,
            issue_count: selected.len(),
            stats: Some(stats),
            burndown,
            velocity,
        }
    }
}
