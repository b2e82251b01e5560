use chrono::NaiveDate;

/// Locale-specific holiday table consulted by the working-day calendar.
///
/// Implementations must be pure: the answer for a given date never changes
/// for the lifetime of the value.
pub trait HolidayCalendar: Send + Sync {
    /// Human readable name of the holiday on `date`, if any.
    fn holiday_name(&self, date: NaiveDate) -> Option<&str>;

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }
}
