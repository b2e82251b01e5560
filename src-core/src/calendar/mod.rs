pub mod calendar_traits;
pub mod holidays;
pub mod working_days;

pub use calendar_traits::HolidayCalendar;
pub use holidays::{HolidayCalendarKind, HolidayList, JapaneseHolidays, NoHolidays};
pub use working_days::{HolidayEntry, WorkingDayCalendar};
