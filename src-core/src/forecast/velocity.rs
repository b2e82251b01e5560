use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::forecast::forecast_model::{ForecastSettings, VelocityPoint};
use crate::issues::Issue;

/// Daily completions from `start` through today with a running total and a
/// trailing average over `settings.trailing_velocity_days` calendar days.
///
/// The average always divides by the full window length, weekends included.
pub fn build_velocity_series(
    issues: &[Issue],
    start: NaiveDate,
    now: DateTime<Utc>,
    settings: &ForecastSettings,
) -> Vec<VelocityPoint> {
    let offset = settings.offset();
    let today = settings.local_date(now);
    let window = settings.trailing_velocity_days.max(1);

    let closed: Vec<(NaiveDate, f64)> = issues
        .iter()
        .filter_map(|issue| issue.closed_on(&offset).map(|day| (day, issue.story_points)))
        .collect();

    let mut series = Vec::new();
    let mut cumulative = 0.0;

    for date in start.iter_days().take_while(|date| *date <= today) {
        let completed: f64 = closed
            .iter()
            .filter(|(day, _)| *day == date)
            .map(|(_, points)| points)
            .sum();
        cumulative += completed;

        let window_start = date
            .checked_sub_days(Days::new(u64::from(window)))
            .unwrap_or(NaiveDate::MIN);
        let trailing: f64 = closed
            .iter()
            .filter(|(day, _)| *day > window_start && *day <= date)
            .map(|(_, points)| points)
            .sum();

        series.push(VelocityPoint {
            date,
            completed_sp: completed,
            cumulative_sp: cumulative,
            velocity: trailing / f64::from(window),
        });
    }

    series
}
