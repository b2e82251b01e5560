use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::calendar::WorkingDayCalendar;
use crate::forecast::forecast_model::{ForecastSettings, SprintStats};
use crate::issues::Issue;

/// First day of every series: the earliest creation day, or today for an
/// empty selection.
pub fn series_start(issues: &[Issue], now: DateTime<Utc>, settings: &ForecastSettings) -> NaiveDate {
    let earliest = issues
        .iter()
        .map(|issue| issue.created_at)
        .min()
        .unwrap_or(now);
    settings.local_date(earliest)
}

/// A completion date is only meaningful once work has been done, recent
/// throughput is measurable and something is left to do.
pub(crate) fn can_predict(completed: f64, working_day_velocity: f64, remaining: f64) -> bool {
    completed > 0.0 && working_day_velocity > 0.0 && remaining > 0.0
}

/// Working days needed to burn `remaining` at `velocity`, `None` beyond the
/// configured forecast horizon.
pub(crate) fn working_days_to_complete(
    remaining: f64,
    velocity: f64,
    settings: &ForecastSettings,
) -> Option<u32> {
    let days = (remaining / velocity).ceil();
    (days.is_finite() && days <= f64::from(settings.max_forecast_working_days)).then(|| days as u32)
}

/// Reduce an issue selection to its sprint statistics as of `now`.
///
/// Returns `None` for an empty selection.
pub fn compute_sprint_stats(
    issues: &[Issue],
    now: DateTime<Utc>,
    calendar: &WorkingDayCalendar,
    settings: &ForecastSettings,
) -> Option<SprintStats> {
    if issues.is_empty() {
        return None;
    }

    let offset = settings.offset();
    let today = settings.local_date(now);

    let total: f64 = issues.iter().map(|issue| issue.story_points).sum();
    let completed: f64 = issues
        .iter()
        .filter(|issue| issue.is_closed())
        .map(|issue| issue.story_points)
        .sum();
    let remaining = total - completed;
    let completion_rate = if total > 0.0 {
        completed / total * 100.0
    } else {
        0.0
    };

    let start = series_start(issues, now, settings);
    let days_elapsed = (today - start).num_days() + 1;
    let working_days_elapsed = calendar.working_days_between(start, today);

    // Recent throughput: closed in (today - window, today]
    let window_start = today
        .checked_sub_days(Days::new(u64::from(settings.recency_window_days)))
        .unwrap_or(NaiveDate::MIN);
    let recent_completed: f64 = issues
        .iter()
        .filter(|issue| {
            issue
                .closed_on(&offset)
                .is_some_and(|day| day > window_start && day <= today)
        })
        .map(|issue| issue.story_points)
        .sum();
    let recent_working_days = calendar.working_days_between(window_start, today);
    let working_day_velocity = if recent_working_days > 0 {
        recent_completed / f64::from(recent_working_days)
    } else {
        0.0
    };

    let velocity = if days_elapsed > 0 {
        completed / days_elapsed as f64
    } else {
        0.0
    };

    let mut predicted_completion_date = None;
    let mut working_day_completion_date = None;

    if can_predict(completed, working_day_velocity, remaining) {
        working_day_completion_date =
            working_days_to_complete(remaining, working_day_velocity, settings)
                .and_then(|days| calendar.add_working_days(today, days));

        if velocity > 0.0 && working_day_completion_date.is_some() {
            let remaining_days = (remaining / velocity).ceil();
            if remaining_days.is_finite() && remaining_days <= i32::MAX as f64 {
                predicted_completion_date =
                    today.checked_add_days(Days::new(remaining_days as u64));
            }
        }
    }

    log::debug!(
        "Stats for {} issues: {}/{} SP done, {:.2} SP/working day, completion {:?}",
        issues.len(),
        completed,
        total,
        working_day_velocity,
        working_day_completion_date
    );

    Some(SprintStats {
        total_story_points: total,
        completed_story_points: completed,
        remaining_story_points: remaining,
        completion_rate,
        velocity,
        working_day_velocity,
        days_elapsed,
        working_days_elapsed,
        start_date: start,
        predicted_completion_date,
        working_day_completion_date,
    })
}
