pub mod calendar;
pub mod errors;
pub mod forecast;
pub mod issues;

pub use calendar::{HolidayCalendar, HolidayCalendarKind, WorkingDayCalendar};
pub use errors::{Error, Result, ValidationError};
pub use forecast::{DashboardSnapshot, ForecastService, ForecastSettings};
pub use issues::{Issue, IssueFilter, IssueState, Sprint};
