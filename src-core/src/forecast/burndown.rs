use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::calendar::WorkingDayCalendar;
use crate::forecast::forecast_model::{BurndownPoint, ForecastSettings, SprintStats};
use crate::forecast::sprint_stats::{can_predict, working_days_to_complete};
use crate::issues::Issue;

/// Last day shown: a padding past the predicted working-day completion, or a
/// fixed horizon past today when nothing can be predicted.
fn display_window_end(stats: &SprintStats, today: NaiveDate, settings: &ForecastSettings) -> NaiveDate {
    let (anchor, padding) = match stats.working_day_completion_date {
        Some(completion) => (completion, settings.display_padding_days),
        None => (today, settings.fallback_horizon_days),
    };
    anchor
        .checked_add_days(Days::new(u64::from(padding)))
        .unwrap_or(anchor)
}

/// Build the burndown/burnup series from `start` through the display window.
///
/// Remaining work is measured against the fixed `stats` scope, while the
/// scope line follows issue creation day by day. Days after today carry a
/// working-day forecast starting exactly at today's actual values, but only
/// when the same conditions that gate the completion date hold.
pub fn build_burndown(
    issues: &[Issue],
    stats: &SprintStats,
    start: NaiveDate,
    now: DateTime<Utc>,
    calendar: &WorkingDayCalendar,
    settings: &ForecastSettings,
) -> Vec<BurndownPoint> {
    if issues.is_empty() {
        return Vec::new();
    }

    let offset = settings.offset();
    let today = settings.local_date(now);
    let end = display_window_end(stats, today, settings);
    let fixed_scope = stats.total_story_points;

    let closed: Vec<(NaiveDate, f64)> = issues
        .iter()
        .filter_map(|issue| issue.closed_on(&offset).map(|day| (day, issue.story_points)))
        .collect();
    let created: Vec<(NaiveDate, f64)> = issues
        .iter()
        .map(|issue| (issue.created_on(&offset), issue.story_points))
        .collect();

    let mut points: Vec<BurndownPoint> = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let is_actual = date <= today;
            let completed: f64 = closed
                .iter()
                .filter(|(day, _)| *day <= date)
                .map(|(_, points)| points)
                .sum();
            let scope: f64 = created
                .iter()
                .filter(|(day, _)| *day <= date)
                .map(|(_, points)| points)
                .sum();

            BurndownPoint {
                date,
                remaining_story_points: is_actual.then_some(fixed_scope - completed),
                completed_story_points: completed,
                scope_line: scope,
                working_day_prediction: None,
                burnup_working_day_prediction: None,
                is_actual,
                is_prediction: !is_actual,
            }
        })
        .collect();

    // Seed the forecast lines at today's actual values
    let (current_remaining, current_completed) =
        match points.iter_mut().find(|point| point.date == today) {
            Some(anchor) => {
                anchor.working_day_prediction = anchor.remaining_story_points;
                anchor.burnup_working_day_prediction = Some(anchor.completed_story_points);
                (
                    anchor
                        .remaining_story_points
                        .unwrap_or(stats.remaining_story_points),
                    anchor.completed_story_points,
                )
            }
            None => (stats.remaining_story_points, stats.completed_story_points),
        };

    let velocity = stats.working_day_velocity;
    if !can_predict(current_completed, velocity, current_remaining) {
        return points;
    }

    let Some(predicted_completion) = working_days_to_complete(current_remaining, velocity, settings)
        .and_then(|days| calendar.add_working_days(today, days))
    else {
        return points;
    };

    for point in points.iter_mut().filter(|point| point.is_prediction) {
        if point.date <= predicted_completion {
            let working_days = f64::from(calendar.working_days_between(today, point.date));
            point.working_day_prediction = Some((current_remaining - velocity * working_days).max(0.0));
            point.burnup_working_day_prediction =
                Some((current_completed + velocity * working_days).min(fixed_scope));
        } else {
            point.working_day_prediction = Some(0.0);
            point.burnup_working_day_prediction = Some(fixed_scope);
        }
    }

    points
}
