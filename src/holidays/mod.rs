//! Holiday calendar and week-window resolution.
//!
//! [`HolidayCalendar`] finds each holiday's anchor date for a year.
//! [`WeekWindowResolver`] turns anchors into Monday–Sunday [`HolidayWindow`]s.

pub mod calendar;
pub mod types;
pub mod window;

pub use calendar::HolidayCalendar;
pub use types::{ComputedRule, Holiday, HolidayDefinition, HolidayRule};
pub use window::{HolidayWindow, WeekWindowResolver, WindowTag};
