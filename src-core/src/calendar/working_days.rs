use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::calendar_traits::HolidayCalendar;
use crate::calendar::holidays::NoHolidays;

/// A holiday falling inside a queried range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
}

/// Working-day arithmetic over a holiday table.
///
/// A working day is neither Saturday, Sunday nor a holiday of the wrapped
/// table. All methods are pure.
#[derive(Clone)]
pub struct WorkingDayCalendar {
    holidays: Arc<dyn HolidayCalendar>,
}

impl WorkingDayCalendar {
    pub fn new(holidays: Arc<dyn HolidayCalendar>) -> Self {
        WorkingDayCalendar { holidays }
    }

    /// Calendar that only skips weekends.
    pub fn weekends_only() -> Self {
        Self::new(Arc::new(NoHolidays))
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.is_holiday(date)
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.is_holiday(date)
    }

    /// Date of the `n`-th working day strictly after `start`.
    /// `n == 0` returns `start` unchanged; `None` past the last representable date.
    pub fn add_working_days(&self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        let mut current = start;
        let mut added = 0;
        while added < n {
            current = current.checked_add_days(Days::new(1))?;
            if self.is_working_day(current) {
                added += 1;
            }
        }
        Some(current)
    }

    /// Inclusive count of working days in `[start, end]`, 0 when `end < start`.
    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .count() as u32
    }

    /// Holidays (weekends excluded) in `[start, end]`.
    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<HolidayEntry> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter_map(|date| {
                self.holidays.holiday_name(date).map(|name| HolidayEntry {
                    date,
                    name: name.to_string(),
                })
            })
            .collect()
    }
}

impl Default for WorkingDayCalendar {
    fn default() -> Self {
        Self::weekends_only()
    }
}

impl fmt::Debug for WorkingDayCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingDayCalendar").finish_non_exhaustive()
    }
}
