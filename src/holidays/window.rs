//! Monday–Sunday week windows anchored to holidays.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

use super::calendar::HolidayCalendar;
use super::types::{Holiday, HolidayRule};
use crate::error::{HolidayError, Result};

/// Identifies one holiday week: the holiday and the year it belongs to.
///
/// The year is the holiday's year, which can differ from the calendar year
/// of dates inside the window (New Year, Christmas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WindowTag {
    pub holiday: Holiday,
    pub year: i32,
}

impl WindowTag {
    pub fn new(holiday: Holiday, year: i32) -> Self {
        Self { holiday, year }
    }
}

impl fmt::Display for WindowTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.holiday, self.year)
    }
}

/// A 7-day window. `start` is always a Monday and `end == start + 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HolidayWindow {
    pub holiday: Holiday,
    pub year: i32,
    pub anchor: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayWindow {
    /// The window of the week containing `anchor`.
    pub fn around(holiday: Holiday, year: i32, anchor: NaiveDate) -> Self {
        let start = monday_on_or_before(anchor);
        Self {
            holiday,
            year,
            anchor,
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn tag(&self) -> WindowTag {
        WindowTag::new(self.holiday, self.year)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start <= to && from <= self.end
    }

    /// Every date in the window, Monday first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    fn shifted(self, holiday: Holiday, weeks: i32) -> Self {
        let by = Duration::weeks(i64::from(weeks));
        Self {
            holiday,
            year: self.year,
            anchor: self.anchor + by,
            start: self.start + by,
            end: self.end + by,
        }
    }
}

/// The Monday on or before `date`.
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Turns holiday anchors into week windows.
#[derive(Debug, Clone, Copy)]
pub struct WeekWindowResolver<'a> {
    calendar: &'a HolidayCalendar,
}

impl<'a> WeekWindowResolver<'a> {
    pub fn new(calendar: &'a HolidayCalendar) -> Self {
        Self { calendar }
    }

    /// The window of `holiday` in `year`.
    ///
    /// Derived holidays take their base holiday's window moved by whole
    /// weeks. Windows are never clipped to `year`.
    pub fn window_for(&self, holiday: Holiday, year: i32) -> Result<HolidayWindow> {
        match self.calendar.rule(holiday)? {
            HolidayRule::Derived { base, week_offset } => Ok(self
                .window_for(*base, year)?
                .shifted(holiday, *week_offset)),
            _ => {
                let anchor = self.calendar.resolve(holiday, year)?;
                Ok(HolidayWindow::around(holiday, year, anchor))
            }
        }
    }

    /// Windows for every configured holiday in `year`, in definition order.
    pub fn windows_for_year(&self, year: i32) -> Result<Vec<HolidayWindow>> {
        self.calendar
            .holidays()
            .map(|h| self.window_for(h, year))
            .collect()
    }

    /// Windows for every year in `years`. An empty range is a configuration error.
    pub fn windows_for_years(&self, years: RangeInclusive<i32>) -> Result<Vec<HolidayWindow>> {
        if years.is_empty() {
            return Err(HolidayError::Config(format!(
                "year range {}..={} is empty",
                years.start(),
                years.end()
            )));
        }
        let mut windows = Vec::new();
        for year in years {
            windows.extend(self.windows_for_year(year)?);
        }
        debug!(count = windows.len(), "Resolved holiday windows");
        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_every_window_is_monday_to_sunday() {
        let cal = HolidayCalendar::us_travel();
        let resolver = WeekWindowResolver::new(&cal);
        for w in resolver.windows_for_years(1995..=2055).unwrap() {
            assert_eq!(w.start.weekday(), Weekday::Mon, "{}", w.tag());
            assert_eq!(w.end.weekday(), Weekday::Sun, "{}", w.tag());
            assert_eq!((w.end - w.start).num_days(), 6);
            assert!(w.contains(w.anchor));
        }
    }

    #[test]
    fn test_black_friday_follows_thanksgiving_window() {
        let cal = HolidayCalendar::us_travel();
        let resolver = WeekWindowResolver::new(&cal);
        for year in 1995..=2055 {
            let tg = resolver.window_for(Holiday::Thanksgiving, year).unwrap();
            let bf = resolver.window_for(Holiday::BlackFriday, year).unwrap();
            assert_eq!(bf.start - tg.start, Duration::days(7));
            assert_eq!(bf.end - tg.end, Duration::days(7));
            assert_eq!(bf.holiday, Holiday::BlackFriday);
        }
        let bf = resolver.window_for(Holiday::BlackFriday, 2024).unwrap();
        assert_eq!((bf.start, bf.end), (ymd(2024, 12, 2), ymd(2024, 12, 8)));
    }

    #[test]
    fn test_reversed_year_range_is_rejected() {
        let cal = HolidayCalendar::us_travel();
        let resolver = WeekWindowResolver::new(&cal);
        assert!(matches!(
            resolver.windows_for_years(2025..=2020),
            Err(HolidayError::Config(_))
        ));
        assert_eq!(resolver.windows_for_years(2024..=2024).unwrap().len(), 14);
    }

    #[test]
    fn test_christmas_2024_stays_in_december() {
        let cal = HolidayCalendar::us_travel();
        let w = WeekWindowResolver::new(&cal)
            .window_for(Holiday::Christmas, 2024)
            .unwrap();
        assert_eq!(w.start, ymd(2024, 12, 23));
        assert_eq!(w.end, ymd(2024, 12, 29));
    }

    #[test]
    fn test_window_spills_into_next_january() {
        let w = HolidayWindow::around(Holiday::Christmas, 2024, ymd(2024, 12, 30));
        assert_eq!(w.start, ymd(2024, 12, 30));
        assert_eq!(w.end, ymd(2025, 1, 5));
        assert_eq!(w.year, 2024);
    }

    #[test]
    fn test_new_year_window_starts_in_previous_december() {
        let cal = HolidayCalendar::us_travel();
        let w = WeekWindowResolver::new(&cal)
            .window_for(Holiday::NewYear, 2025)
            .unwrap();
        assert_eq!(w.start, ymd(2024, 12, 30));
        assert_eq!(w.end, ymd(2025, 1, 5));
        assert_eq!(w.year, 2025);
    }

    #[test]
    fn test_dates_cover_the_week() {
        let w = HolidayWindow::around(Holiday::Halloween, 2024, ymd(2024, 10, 31));
        let dates: Vec<_> = w.dates().collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], ymd(2024, 10, 28));
        assert_eq!(dates[6], ymd(2024, 11, 3));
    }

    #[test]
    fn test_monday_anchor_is_its_own_start() {
        assert_eq!(monday_on_or_before(ymd(2024, 9, 2)), ymd(2024, 9, 2));
        assert_eq!(monday_on_or_before(ymd(2024, 9, 8)), ymd(2024, 9, 2));
    }
}
