//! Holiday tables used by the working-day calendar.
//!
//! `JapaneseHolidays` computes the statutory national holidays of Japan from
//! rules rather than a fixed list, so it covers every year in
//! [`JapaneseHolidays::SUPPORTED_YEARS`] without data files.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::calendar_traits::HolidayCalendar;
use crate::errors::{Result, ValidationError};

/// Weekends only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn holiday_name(&self, _date: NaiveDate) -> Option<&str> {
        None
    }
}

/// An explicit set of non-working dates, e.g. company closure days.
#[derive(Debug, Clone, Default)]
pub struct HolidayList {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holiday(mut self, date: NaiveDate, name: impl Into<String>) -> Self {
        self.days.insert(date, name.into());
        self
    }

    /// Build a list from `YYYY-MM-DD` strings.
    pub fn parse<I, S>(dates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for raw in dates {
            let raw = raw.as_ref().trim();
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate(raw.to_string()))?;
            list.days.insert(date, "Holiday".to_string());
        }
        Ok(list)
    }

    /// Build a list from a text table: one `YYYY-MM-DD` or `YYYY-MM-DD,Name`
    /// per line. Blank lines and `#` comments are skipped.
    pub fn parse_table(raw: &str) -> Result<Self> {
        let mut list = Self::new();
        for line in raw.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (day, name) = match line.split_once(',') {
                Some((day, name)) if !name.trim().is_empty() => (day.trim(), name.trim()),
                Some((day, _)) => (day.trim(), "Holiday"),
                None => (line, "Holiday"),
            };
            let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate(day.to_string()))?;
            list.days.insert(date, name.to_string());
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl HolidayCalendar for HolidayList {
    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }
}

/// National holidays of Japan.
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseHolidays;

impl JapaneseHolidays {
    pub const SUPPORTED_YEARS: RangeInclusive<i32> = 2007..=2099;
}

impl HolidayCalendar for JapaneseHolidays {
    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        if !Self::SUPPORTED_YEARS.contains(&date.year()) {
            return None;
        }
        if let Some(name) = statutory_holiday(date) {
            return Some(name);
        }
        if is_substitute_holiday(date) {
            return Some("Substitute Holiday");
        }
        if is_citizens_holiday(date) {
            return Some("Citizens' Holiday");
        }
        None
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn nth_monday(year: i32, month: u32, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n)
}

// Equinox approximations valid for 1980-2099.
fn vernal_equinox(year: i32) -> Option<NaiveDate> {
    let y = f64::from(year - 1980);
    let day = (20.8431 + 0.242194 * y - (y / 4.0).floor()).floor() as u32;
    ymd(year, 3, day)
}

fn autumnal_equinox(year: i32) -> Option<NaiveDate> {
    let y = f64::from(year - 1980);
    let day = (23.2488 + 0.242194 * y - (y / 4.0).floor()).floor() as u32;
    ymd(year, 9, day)
}

// 2020 and 2021 moved three holidays around the Tokyo Olympics.
fn marine_day(year: i32) -> Option<NaiveDate> {
    match year {
        2020 => ymd(2020, 7, 23),
        2021 => ymd(2021, 7, 22),
        _ => nth_monday(year, 7, 3),
    }
}

fn mountain_day(year: i32) -> Option<NaiveDate> {
    match year {
        year if year < 2016 => None,
        2020 => ymd(2020, 8, 10),
        2021 => ymd(2021, 8, 8),
        _ => ymd(year, 8, 11),
    }
}

fn sports_day(year: i32) -> Option<NaiveDate> {
    match year {
        2020 => ymd(2020, 7, 24),
        2021 => ymd(2021, 7, 23),
        _ => nth_monday(year, 10, 2),
    }
}

fn statutory_holiday(date: NaiveDate) -> Option<&'static str> {
    let year = date.year();
    let is = |candidate: Option<NaiveDate>| candidate == Some(date);

    if is(ymd(year, 1, 1)) {
        Some("New Year's Day")
    } else if is(nth_monday(year, 1, 2)) {
        Some("Coming of Age Day")
    } else if is(ymd(year, 2, 11)) {
        Some("National Foundation Day")
    } else if year >= 2020 && is(ymd(year, 2, 23)) {
        Some("Emperor's Birthday")
    } else if is(vernal_equinox(year)) {
        Some("Vernal Equinox Day")
    } else if is(ymd(year, 4, 29)) {
        Some("Showa Day")
    } else if year == 2019 && is(ymd(year, 5, 1)) {
        Some("Enthronement Day")
    } else if is(ymd(year, 5, 3)) {
        Some("Constitution Memorial Day")
    } else if is(ymd(year, 5, 4)) {
        Some("Greenery Day")
    } else if is(ymd(year, 5, 5)) {
        Some("Children's Day")
    } else if is(marine_day(year)) {
        Some("Marine Day")
    } else if is(mountain_day(year)) {
        Some("Mountain Day")
    } else if is(nth_monday(year, 9, 3)) {
        Some("Respect for the Aged Day")
    } else if is(autumnal_equinox(year)) {
        Some("Autumnal Equinox Day")
    } else if is(sports_day(year)) {
        if year >= 2020 {
            Some("Sports Day")
        } else {
            Some("Health and Sports Day")
        }
    } else if year == 2019 && is(ymd(year, 10, 22)) {
        Some("Enthronement Ceremony Day")
    } else if is(ymd(year, 11, 3)) {
        Some("Culture Day")
    } else if is(ymd(year, 11, 23)) {
        Some("Labor Thanksgiving Day")
    } else if year <= 2018 && is(ymd(year, 12, 23)) {
        Some("Emperor's Birthday")
    } else {
        None
    }
}

/// A holiday on a Sunday moves to the next day that is not itself a holiday.
fn is_substitute_holiday(date: NaiveDate) -> bool {
    if statutory_holiday(date).is_some() {
        return false;
    }
    let mut previous = date.checked_sub_days(Days::new(1));
    while let Some(day) = previous {
        if statutory_holiday(day).is_none() {
            return false;
        }
        if day.weekday() == Weekday::Sun {
            return true;
        }
        previous = day.checked_sub_days(Days::new(1));
    }
    false
}

/// A plain weekday sandwiched between two statutory holidays.
fn is_citizens_holiday(date: NaiveDate) -> bool {
    if date.weekday() == Weekday::Sun || statutory_holiday(date).is_some() {
        return false;
    }
    let before = date.checked_sub_days(Days::new(1)).and_then(statutory_holiday);
    let after = date.checked_add_days(Days::new(1)).and_then(statutory_holiday);
    before.is_some() && after.is_some()
}

/// Holiday table selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayCalendarKind {
    None,
    #[default]
    Japan,
    /// Dates supplied from a holiday table
    List,
}

impl HolidayCalendarKind {
    /// Resolve the holiday table. `List` takes its dates from `list`.
    pub fn into_calendar(self, list: Option<HolidayList>) -> Result<Arc<dyn HolidayCalendar>> {
        match (self, list) {
            (HolidayCalendarKind::None, _) => Ok(Arc::new(NoHolidays)),
            (HolidayCalendarKind::Japan, _) => Ok(Arc::new(JapaneseHolidays)),
            (HolidayCalendarKind::List, Some(list)) => Ok(Arc::new(list)),
            (HolidayCalendarKind::List, None) => Err(ValidationError::InvalidInput(
                "Holiday calendar 'list' needs a holiday table".to_string(),
            )
            .into()),
        }
    }
}

impl FromStr for HolidayCalendarKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "weekends" => Ok(HolidayCalendarKind::None),
            "japan" | "jp" => Ok(HolidayCalendarKind::Japan),
            "list" | "file" => Ok(HolidayCalendarKind::List),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown holiday calendar '{}', expected 'japan', 'list' or 'none'",
                other
            ))),
        }
    }
}
