//! ISO-8601 week numbering for the calendar-week view.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// An ISO week: Monday-start, week 1 holds the year's first Thursday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct IsoWeekId {
    pub iso_year: i32,
    pub week: u32,
}

/// The ISO week-year and week number containing `date`.
///
/// Near year boundaries `iso_year` can differ from `date.year()`.
pub fn iso_week_of(date: NaiveDate) -> IsoWeekId {
    let iso = date.iso_week();
    IsoWeekId {
        iso_year: iso.year(),
        week: iso.week(),
    }
}
