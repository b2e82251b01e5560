/// Tests for sprint statistics, the burndown/burnup projection and the
/// velocity series. All scenarios use a weekends-only calendar in UTC with
/// "now" fixed at Wednesday 2025-06-18 12:00.

mod common {
    use chrono::{DateTime, NaiveDate, Utc};
    use sprintview_core::calendar::WorkingDayCalendar;
    use sprintview_core::forecast::{ForecastService, ForecastSettings};
    use sprintview_core::issues::{Issue, IssueState};
    use std::collections::BTreeSet;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn at_noon(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&format!("{}T12:00:00Z", s))
            .unwrap()
            .with_timezone(&Utc)
    }

    pub fn now() -> DateTime<Utc> {
        at_noon("2025-06-18")
    }

    pub fn utc_settings() -> ForecastSettings {
        ForecastSettings {
            utc_offset_seconds: 0,
            ..ForecastSettings::default()
        }
    }

    pub fn service() -> ForecastService {
        ForecastService::new(WorkingDayCalendar::weekends_only(), utc_settings())
    }

    pub fn open_issue(id: &str, points: f64, created: &str) -> Issue {
        Issue {
            id: id.to_string(),
            title: format!("Issue {}", id),
            state: IssueState::Open,
            story_points: points,
            created_at: at_noon(created),
            closed_at: None,
            assignee: None,
            labels: BTreeSet::new(),
            sprint: None,
        }
    }

    pub fn closed_issue(id: &str, points: f64, created: &str, closed: &str) -> Issue {
        Issue {
            state: IssueState::Closed,
            closed_at: Some(at_noon(closed)),
            ..open_issue(id, points, created)
        }
    }

    /// 11 SP closed on Monday, 3 SP still open and added a week later.
    pub fn predictable_issues() -> Vec<Issue> {
        vec![
            closed_issue("1", 11.0, "2025-06-02", "2025-06-16"),
            open_issue("2", 3.0, "2025-06-10"),
        ]
    }
}

#[cfg(test)]
mod sprint_stats_tests {
    use super::common::*;

    #[test]
    fn test_open_issue_only_is_unpredictable() {
        let issues = vec![open_issue("1", 5.0, "2025-06-08")];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert_eq!(stats.total_story_points, 5.0);
        assert_eq!(stats.completed_story_points, 0.0);
        assert_eq!(stats.remaining_story_points, 5.0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.days_elapsed, 11);
        assert_eq!(stats.predicted_completion_date, None);
        assert_eq!(stats.working_day_completion_date, None);
    }

    #[test]
    fn test_recent_progress_predicts_completion() {
        let issues = predictable_issues();
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert_eq!(stats.total_story_points, 14.0);
        assert_eq!(stats.completed_story_points, 11.0);
        assert_eq!(stats.remaining_story_points, 3.0);
        assert!((stats.completion_rate - 11.0 / 14.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.start_date, date("2025-06-02"));
        assert_eq!(stats.days_elapsed, 17);
        assert_eq!(stats.working_days_elapsed, 13);
        // 11 SP over the 11 working days of [06-04, 06-18]
        assert_eq!(stats.working_day_velocity, 1.0);
        assert!((stats.velocity - 11.0 / 17.0).abs() < 1e-9);
        assert_eq!(stats.working_day_completion_date, Some(date("2025-06-23")));
        assert_eq!(stats.predicted_completion_date, Some(date("2025-06-23")));
    }

    #[test]
    fn test_completion_date_is_after_today() {
        let issues = vec![
            closed_issue("1", 5.0, "2025-06-02", "2025-06-15"),
            open_issue("2", 5.0, "2025-06-02"),
        ];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert!(stats.working_day_velocity > 0.0);
        let completion = stats.working_day_completion_date.expect("should be predictable");
        assert!(completion > date("2025-06-18"));
        assert!(stats.predicted_completion_date.is_some());
    }

    #[test]
    fn test_zero_scope_has_no_rate_and_no_prediction() {
        let issues = vec![
            closed_issue("1", 0.0, "2025-06-02", "2025-06-16"),
            open_issue("2", 0.0, "2025-06-02"),
        ];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.velocity, 0.0);
        assert_eq!(stats.predicted_completion_date, None);
        assert_eq!(stats.working_day_completion_date, None);
    }

    #[test]
    fn test_stale_completions_do_not_count_as_recent() {
        // Closed long before the recency window opened
        let issues = vec![
            closed_issue("1", 8.0, "2025-05-01", "2025-05-05"),
            open_issue("2", 3.0, "2025-05-01"),
        ];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert!(stats.velocity > 0.0, "all-time velocity still measures old work");
        assert_eq!(stats.working_day_velocity, 0.0);
        assert_eq!(stats.predicted_completion_date, None);
        assert_eq!(stats.working_day_completion_date, None);
    }

    #[test]
    fn test_recency_window_excludes_its_first_day() {
        // 2025-06-04 is exactly 14 days before today
        let edge = vec![
            closed_issue("1", 4.0, "2025-06-01", "2025-06-04"),
            open_issue("2", 3.0, "2025-06-01"),
        ];
        let inside = vec![
            closed_issue("1", 4.0, "2025-06-01", "2025-06-05"),
            open_issue("2", 3.0, "2025-06-01"),
        ];

        assert_eq!(service().sprint_stats(&edge, now()).unwrap().working_day_velocity, 0.0);
        assert!(service().sprint_stats(&inside, now()).unwrap().working_day_velocity > 0.0);
    }

    #[test]
    fn test_finished_work_is_unpredictable() {
        let issues = vec![closed_issue("1", 5.0, "2025-06-02", "2025-06-16")];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert_eq!(stats.remaining_story_points, 0.0);
        assert_eq!(stats.completion_rate, 100.0);
        assert_eq!(stats.working_day_completion_date, None);
    }

    #[test]
    fn test_forecast_beyond_horizon_is_unpredictable() {
        // A sliver of recent throughput against a huge backlog
        let issues = vec![
            closed_issue("1", 0.0001, "2025-06-02", "2025-06-17"),
            open_issue("2", 1_000_000.0, "2025-06-02"),
        ];
        let stats = service().sprint_stats(&issues, now()).unwrap();

        assert!(stats.working_day_velocity > 0.0);
        assert_eq!(stats.working_day_completion_date, None);
        assert_eq!(stats.predicted_completion_date, None);
    }

    #[test]
    fn test_empty_selection_has_no_stats() {
        assert!(service().sprint_stats(&[], now()).is_none());
    }
}

#[cfg(test)]
mod burndown_tests {
    use super::common::*;
    use sprintview_core::forecast::BurndownPoint;

    fn point<'a>(points: &'a [BurndownPoint], day: &str) -> &'a BurndownPoint {
        points
            .iter()
            .find(|p| p.date == date(day))
            .unwrap_or_else(|| panic!("no point for {}", day))
    }

    fn predictable_burndown() -> Vec<BurndownPoint> {
        let service = service();
        let issues = predictable_issues();
        let stats = service.sprint_stats(&issues, now()).unwrap();
        service.burndown(&issues, &stats, now())
    }

    #[test]
    fn test_window_runs_from_start_to_padded_completion() {
        let points = predictable_burndown();

        // 2025-06-02 ..= 2025-06-23 + 7 days
        assert_eq!(points.first().unwrap().date, date("2025-06-02"));
        assert_eq!(points.last().unwrap().date, date("2025-06-30"));
        assert_eq!(points.len(), 29);
    }

    #[test]
    fn test_actual_and_prediction_partition_the_window() {
        let points = predictable_burndown();

        for p in &points {
            assert_ne!(p.is_actual, p.is_prediction, "exactly one flag per point");
            assert_eq!(p.is_actual, p.date <= date("2025-06-18"));
            assert_eq!(p.remaining_story_points.is_some(), p.is_actual);
        }
        assert_eq!(points.iter().filter(|p| p.is_actual).count(), 17);
    }

    #[test]
    fn test_remaining_uses_fixed_scope_but_scope_line_grows() {
        let points = predictable_burndown();

        let first = point(&points, "2025-06-02");
        assert_eq!(first.remaining_story_points, Some(14.0));
        assert_eq!(first.scope_line, 11.0);

        assert_eq!(point(&points, "2025-06-10").scope_line, 14.0);
        assert_eq!(point(&points, "2025-06-15").remaining_story_points, Some(14.0));
        assert_eq!(point(&points, "2025-06-16").remaining_story_points, Some(3.0));
        assert_eq!(point(&points, "2025-06-16").completed_story_points, 11.0);
    }

    #[test]
    fn test_scope_line_never_decreases_and_remaining_never_rises() {
        let points = predictable_burndown();

        for pair in points.windows(2) {
            assert!(pair[1].scope_line >= pair[0].scope_line);
            if let (Some(a), Some(b)) = (pair[0].remaining_story_points, pair[1].remaining_story_points) {
                assert!(b <= a, "remaining must not grow between {} and {}", pair[0].date, pair[1].date);
            }
        }
    }

    #[test]
    fn test_forecast_starts_at_todays_actuals() {
        let points = predictable_burndown();
        let anchor = point(&points, "2025-06-18");

        assert!(anchor.is_actual);
        assert_eq!(anchor.working_day_prediction, anchor.remaining_story_points);
        assert_eq!(anchor.burnup_working_day_prediction, Some(anchor.completed_story_points));

        // Days before today carry no forecast
        assert_eq!(point(&points, "2025-06-17").working_day_prediction, None);
    }

    #[test]
    fn test_forecast_is_linear_then_terminal() {
        let points = predictable_burndown();

        // working days counted over [today, date], today included
        let thursday = point(&points, "2025-06-19");
        assert_eq!(thursday.working_day_prediction, Some(1.0));
        assert_eq!(thursday.burnup_working_day_prediction, Some(13.0));

        let friday = point(&points, "2025-06-20");
        assert_eq!(friday.working_day_prediction, Some(0.0));
        assert_eq!(friday.burnup_working_day_prediction, Some(14.0));

        let completion_day = point(&points, "2025-06-23");
        assert_eq!(completion_day.working_day_prediction, Some(0.0));
        assert_eq!(completion_day.burnup_working_day_prediction, Some(14.0));

        for p in points.iter().filter(|p| p.date > date("2025-06-23")) {
            assert_eq!(p.working_day_prediction, Some(0.0));
            assert_eq!(p.burnup_working_day_prediction, Some(14.0));
        }
    }

    #[test]
    fn test_no_forecast_without_completed_work() {
        let service = service();
        let issues = vec![open_issue("1", 5.0, "2025-06-08")];
        let stats = service.sprint_stats(&issues, now()).unwrap();
        let points = service.burndown(&issues, &stats, now());

        // Fallback window: today + 7 days
        assert_eq!(points.last().unwrap().date, date("2025-06-25"));
        assert_eq!(points.len(), 18);

        let anchor = point(&points, "2025-06-18");
        assert_eq!(anchor.working_day_prediction, Some(5.0));
        assert_eq!(anchor.burnup_working_day_prediction, Some(0.0));

        for p in points.iter().filter(|p| p.is_prediction) {
            assert_eq!(p.working_day_prediction, None);
            assert_eq!(p.burnup_working_day_prediction, None);
        }
    }

    #[test]
    fn test_no_forecast_beyond_horizon() {
        let service = service();
        let issues = vec![
            closed_issue("1", 0.0001, "2025-06-02", "2025-06-17"),
            open_issue("2", 1_000_000.0, "2025-06-02"),
        ];
        let stats = service.sprint_stats(&issues, now()).unwrap();
        let points = service.burndown(&issues, &stats, now());

        assert_eq!(points.last().unwrap().date, date("2025-06-25"));
        for p in points.iter().filter(|p| p.is_prediction) {
            assert_eq!(p.working_day_prediction, None);
            assert_eq!(p.burnup_working_day_prediction, None);
        }
    }

    #[test]
    fn test_future_series_forecasts_from_stats_totals() {
        let service = service();
        let issues = vec![
            open_issue("1", 5.0, "2025-06-20"),
            closed_issue("2", 2.0, "2025-06-20", "2025-06-23"),
        ];
        // Stats taken after the first completion, series drawn before it started
        let stats = service.sprint_stats(&issues, at_noon("2025-06-24")).unwrap();
        assert_eq!(stats.start_date, date("2025-06-20"));
        assert!(stats.working_day_velocity > 0.0);

        let points = service.burndown(&issues, &stats, now());
        assert_eq!(points.first().unwrap().date, date("2025-06-20"));
        assert!(points.iter().all(|p| p.is_prediction), "today precedes the series");

        // [06-18, 06-20] holds three working days
        let velocity = stats.working_day_velocity;
        let friday = point(&points, "2025-06-20");
        let expected_remaining = 5.0 - velocity * 3.0;
        let expected_completed = 2.0 + velocity * 3.0;
        assert!((friday.working_day_prediction.unwrap() - expected_remaining).abs() < 1e-9);
        assert!((friday.burnup_working_day_prediction.unwrap() - expected_completed).abs() < 1e-9);
        assert_eq!(points.last().unwrap().working_day_prediction, Some(0.0));
    }

    #[test]
    fn test_prediction_fields_are_omitted_from_json_when_unset() {
        let points = predictable_burndown();
        let json = serde_json::to_value(point(&points, "2025-06-02")).unwrap();

        assert_eq!(json["date"], "2025-06-02");
        assert_eq!(json["remainingStoryPoints"], 14.0);
        assert!(json.get("workingDayPrediction").is_none());
        assert_eq!(json["isActual"], true);
    }
}

#[cfg(test)]
mod velocity_tests {
    use super::common::*;
    use sprintview_core::forecast::build_velocity_series;

    #[test]
    fn test_three_day_window_with_one_completion() {
        let issues = vec![
            closed_issue("1", 4.0, "2025-06-16", "2025-06-17"),
            open_issue("2", 2.0, "2025-06-16"),
        ];
        let series = build_velocity_series(&issues, date("2025-06-16"), now(), &utc_settings());

        let completed: Vec<f64> = series.iter().map(|p| p.completed_sp).collect();
        let cumulative: Vec<f64> = series.iter().map(|p| p.cumulative_sp).collect();
        assert_eq!(completed, vec![0.0, 4.0, 0.0]);
        assert_eq!(cumulative, vec![0.0, 4.0, 4.0]);
        assert_eq!(series[0].velocity, 0.0);
        assert_eq!(series[1].velocity, 4.0 / 7.0);
        assert_eq!(series[2].velocity, 4.0 / 7.0);
    }

    #[test]
    fn test_trailing_window_drops_completion_after_seven_days() {
        let issues = vec![closed_issue("1", 7.0, "2025-06-09", "2025-06-10")];
        let series = build_velocity_series(&issues, date("2025-06-09"), now(), &utc_settings());

        let at = |day: &str| series.iter().find(|p| p.date == date(day)).unwrap().velocity;
        assert_eq!(at("2025-06-09"), 0.0);
        assert_eq!(at("2025-06-10"), 1.0);
        assert_eq!(at("2025-06-16"), 1.0);
        assert_eq!(at("2025-06-17"), 0.0, "(d-7, d] excludes the 7th day back");
    }

    #[test]
    fn test_series_ends_today_regardless_of_forecast() {
        let service = service();
        let series = service.velocity(&predictable_issues(), now());

        assert_eq!(series.first().unwrap().date, date("2025-06-02"));
        assert_eq!(series.last().unwrap().date, date("2025-06-18"));
        assert_eq!(series.last().unwrap().cumulative_sp, 11.0);
    }

    #[test]
    fn test_completion_day_follows_configured_offset() {
        let mut issue = closed_issue("1", 3.0, "2025-06-16", "2025-06-17");
        issue.closed_at = Some(
            chrono::DateTime::parse_from_rfc3339("2025-06-17T20:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        );
        let tokyo = sprintview_core::forecast::ForecastSettings::default();

        let series = build_velocity_series(&[issue], date("2025-06-16"), now(), &tokyo);
        let completed: Vec<f64> = series.iter().map(|p| p.completed_sp).collect();
        assert_eq!(completed, vec![0.0, 0.0, 3.0], "20:00 UTC is the next day in Tokyo");
    }

    #[test]
    fn test_velocity_json_field_names() {
        let issues = vec![closed_issue("1", 4.0, "2025-06-18", "2025-06-18")];
        let series = build_velocity_series(&issues, date("2025-06-18"), now(), &utc_settings());
        let json = serde_json::to_value(&series[0]).unwrap();

        assert_eq!(json["completedSP"], 4.0);
        assert_eq!(json["cumulativeSP"], 4.0);
    }
}

#[cfg(test)]
mod dashboard_tests {
    use super::common::*;
    use sprintview_core::forecast::{burndown_to_csv, velocity_to_csv};
    use sprintview_core::issues::IssueFilter;

    #[test]
    fn test_dashboard_is_idempotent() {
        let service = service();
        let issues = predictable_issues();

        let first = service.build_dashboard(&issues, &IssueFilter::all(), now());
        let second = service.build_dashboard(&issues, &IssueFilter::all(), now());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_selection_yields_empty_series() {
        let service = service();
        let issues = predictable_issues();

        let dashboard = service.build_dashboard(&issues, &IssueFilter::all().with_assignee("nobody"), now());
        assert_eq!(dashboard.issue_count, 0);
        assert!(dashboard.stats.is_none());
        assert!(dashboard.burndown.is_empty());
        assert!(dashboard.velocity.is_empty());

        let empty = service.build_dashboard(&[], &IssueFilter::all(), now());
        assert!(empty.stats.is_none());
        assert_eq!(empty.as_of, date("2025-06-18"));
    }

    #[test]
    fn test_filter_narrows_the_selection() {
        let service = service();
        let mut issues = predictable_issues();
        issues[0].assignee = Some("alice".to_string());
        issues[1].assignee = Some("bob".to_string());

        let dashboard = service.build_dashboard(&issues, &IssueFilter::all().with_assignee("bob"), now());
        let stats = dashboard.stats.unwrap();
        assert_eq!(dashboard.issue_count, 1);
        assert_eq!(stats.total_story_points, 3.0);
        assert_eq!(stats.completed_story_points, 0.0);
        assert_eq!(stats.start_date, date("2025-06-10"));
    }

    #[test]
    fn test_csv_export_has_header_and_one_row_per_day() {
        let service = service();
        let dashboard = service.build_dashboard(&predictable_issues(), &IssueFilter::all(), now());

        let burndown = burndown_to_csv(&dashboard.burndown).unwrap();
        let lines: Vec<&str> = burndown.lines().collect();
        assert_eq!(
            lines[0],
            "date,remainingStoryPoints,completedStoryPoints,scopeLine,workingDayPrediction,burnupWorkingDayPrediction,isActual,isPrediction"
        );
        assert_eq!(lines.len(), dashboard.burndown.len() + 1);
        assert!(lines[1].starts_with("2025-06-02,14.0,0.0,11.0,,,true,false"));

        let velocity = velocity_to_csv(&dashboard.velocity).unwrap();
        assert!(velocity.starts_with("date,completedSP,cumulativeSP,velocity"));
        assert_eq!(velocity.lines().count(), dashboard.velocity.len() + 1);
    }

    #[test]
    fn test_csv_export_of_empty_series_keeps_header() {
        let burndown = burndown_to_csv(&[]).unwrap();
        assert_eq!(
            burndown,
            "date,remainingStoryPoints,completedStoryPoints,scopeLine,workingDayPrediction,burnupWorkingDayPrediction,isActual,isPrediction\n"
        );

        let velocity = velocity_to_csv(&[]).unwrap();
        assert_eq!(velocity, "date,completedSP,cumulativeSP,velocity\n");
    }
}

#[cfg(test)]
mod holiday_forecast_tests {
    use super::common::*;
    use sprintview_core::calendar::{HolidayList, JapaneseHolidays, WorkingDayCalendar};
    use sprintview_core::forecast::ForecastService;
    use std::sync::Arc;

    fn service_with_holidays(dates: &[&str]) -> ForecastService {
        let holidays = HolidayList::parse(dates.iter().copied()).unwrap();
        ForecastService::new(WorkingDayCalendar::new(Arc::new(holidays)), utc_settings())
    }

    #[test]
    fn test_holiday_list_slows_velocity_and_delays_completion() {
        let service = service_with_holidays(&["2025-06-11", "2025-06-20"]);
        let issues = predictable_issues();
        let stats = service.sprint_stats(&issues, now()).unwrap();

        // 11 SP over the 10 working days of [06-04, 06-18]
        assert!((stats.working_day_velocity - 1.1).abs() < 1e-9);
        assert_eq!(stats.working_days_elapsed, 12);
        // 3 working days after today: 06-19, 06-23, 06-24
        assert_eq!(stats.working_day_completion_date, Some(date("2025-06-24")));
    }

    #[test]
    fn test_holiday_keeps_burndown_flat() {
        let service = service_with_holidays(&["2025-06-11", "2025-06-20"]);
        let issues = predictable_issues();
        let stats = service.sprint_stats(&issues, now()).unwrap();
        let points = service.burndown(&issues, &stats, now());

        assert_eq!(points.last().unwrap().date, date("2025-07-01"));
        let at = |day: &str| {
            points
                .iter()
                .find(|p| p.date == date(day))
                .and_then(|p| p.working_day_prediction)
                .unwrap()
        };
        assert!((at("2025-06-19") - 0.8).abs() < 1e-9);
        assert!(
            (at("2025-06-20") - at("2025-06-19")).abs() < 1e-9,
            "no progress is forecast on a holiday"
        );
        assert_eq!(at("2025-06-23"), 0.0);
    }

    #[test]
    fn test_japanese_calendar_skips_marine_day() {
        let issues = vec![
            closed_issue("1", 11.0, "2025-07-01", "2025-07-16"),
            open_issue("2", 3.0, "2025-07-10"),
        ];
        let friday = at_noon("2025-07-18");

        let japan = ForecastService::new(WorkingDayCalendar::new(Arc::new(JapaneseHolidays)), utc_settings());
        let weekends = ForecastService::new(WorkingDayCalendar::weekends_only(), utc_settings());

        let jp_stats = japan.sprint_stats(&issues, friday).unwrap();
        let plain_stats = weekends.sprint_stats(&issues, friday).unwrap();

        assert_eq!(jp_stats.working_day_velocity, 1.0);
        assert_eq!(plain_stats.working_day_completion_date, Some(date("2025-07-23")));
        assert_eq!(
            jp_stats.working_day_completion_date,
            Some(date("2025-07-24")),
            "Monday 2025-07-21 is Marine Day"
        );
    }
}
