//! Anchor-date resolution for a configured set of holidays.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

use super::types::{ComputedRule, Holiday, HolidayDefinition, HolidayRule};
use crate::error::{HolidayError, Result};

/// An ordered, validated set of holiday definitions.
///
/// Resolution is a pure function of `(holiday, year)`.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    definitions: Vec<HolidayDefinition>,
}

impl HolidayCalendar {
    /// Validates `definitions` and keeps them in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`HolidayError::InvalidRule`] for duplicate holidays, rules with
    /// out-of-range parameters, and derived rules whose base is missing or
    /// that refer back to themselves.
    pub fn new(definitions: Vec<HolidayDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for def in &definitions {
            if !seen.insert(def.holiday) {
                return Err(HolidayError::invalid_rule(
                    def.holiday,
                    "holiday is defined more than once",
                ));
            }
            validate_rule(def)?;
        }

        let calendar = Self { definitions };
        for def in &calendar.definitions {
            calendar.check_derived_chain(def.holiday)?;
        }
        Ok(calendar)
    }

    /// The 14 built-in US travel holidays in canonical order.
    pub fn us_travel() -> Self {
        Self {
            definitions: Holiday::ALL
                .into_iter()
                .map(HolidayDefinition::builtin)
                .collect(),
        }
    }

    pub fn definitions(&self) -> &[HolidayDefinition] {
        &self.definitions
    }

    /// Holidays in definition order.
    pub fn holidays(&self) -> impl Iterator<Item = Holiday> + '_ {
        self.definitions.iter().map(|d| d.holiday)
    }

    /// Looks up the rule for `holiday`.
    ///
    /// # Errors
    ///
    /// [`HolidayError::UnknownHoliday`] when the calendar has no rule for it.
    pub fn rule(&self, holiday: Holiday) -> Result<&HolidayRule> {
        self.definitions
            .iter()
            .find(|d| d.holiday == holiday)
            .map(|d| &d.rule)
            .ok_or_else(|| HolidayError::UnknownHoliday(holiday.name().to_string()))
    }

    /// Anchor date of `holiday` in `year`.
    ///
    /// A derived holiday's anchor is its base anchor moved by whole weeks.
    pub fn resolve(&self, holiday: Holiday, year: i32) -> Result<NaiveDate> {
        match self.rule(holiday)? {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, *month, *day)
                .ok_or_else(|| {
                    HolidayError::invalid_rule(holiday, format!("{month}/{day} does not exist in {year}"))
                }),
            HolidayRule::NthWeekday {
                month,
                weekday,
                n,
                from_end,
            } => {
                let found = if *from_end {
                    nth_last_weekday(year, *month, *weekday, *n)
                } else {
                    nth_weekday(year, *month, *weekday, *n)
                };
                found.ok_or_else(|| {
                    HolidayError::invalid_rule(
                        holiday,
                        format!("no occurrence {n} of {weekday} in {year}-{month:02}"),
                    )
                })
            }
            HolidayRule::Computed(ComputedRule::Easter) => easter(year).ok_or_else(|| {
                HolidayError::invalid_rule(holiday, format!("easter is undefined for {year}"))
            }),
            HolidayRule::Derived { base, week_offset } => {
                Ok(self.resolve(*base, year)? + Duration::weeks(i64::from(*week_offset)))
            }
        }
    }

    /// Whether `holiday` is only defined relative to another holiday's week.
    pub fn is_derived(&self, holiday: Holiday) -> bool {
        matches!(self.rule(holiday), Ok(HolidayRule::Derived { .. }))
    }

    /// Anchor dates in `year` for the holidays that have a date rule of their own,
    /// in definition order. Derived holidays have a week, not a date, and are left out.
    pub fn anchors(&self, year: i32) -> Result<Vec<(Holiday, NaiveDate)>> {
        self.holidays()
            .filter(|h| !self.is_derived(*h))
            .map(|h| -> Result<(Holiday, NaiveDate)> { Ok((h, self.resolve(h, year)?)) })
            .collect()
    }

    /// Resolves a holiday given by display name or alias.
    pub fn resolve_name(&self, name: &str, year: i32) -> Result<NaiveDate> {
        self.resolve(name.parse()?, year)
    }

    fn check_derived_chain(&self, start: Holiday) -> Result<()> {
        let mut current = start;
        for _ in 0..=self.definitions.len() {
            match self.rule(current) {
                Ok(HolidayRule::Derived { base, .. }) => current = *base,
                Ok(_) => return Ok(()),
                Err(_) => {
                    return Err(HolidayError::invalid_rule(
                        start,
                        format!("derived from {current}, which is not defined"),
                    ));
                }
            }
        }
        Err(HolidayError::invalid_rule(start, "derived rule refers back to itself"))
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::us_travel()
    }
}

fn validate_rule(def: &HolidayDefinition) -> Result<()> {
    let bad = |reason: String| Err(HolidayError::invalid_rule(def.holiday, reason));
    match &def.rule {
        HolidayRule::Fixed { month, day } => {
            // 2000 is a leap year, so Feb 29 passes here and fails per year.
            if NaiveDate::from_ymd_opt(2000, *month, *day).is_none() {
                return bad(format!("{month}/{day} is not a calendar date"));
            }
        }
        HolidayRule::NthWeekday { month, n, .. } => {
            if !(1..=12).contains(month) {
                return bad(format!("month {month} is out of range"));
            }
            if !(1..=5).contains(n) {
                return bad(format!("occurrence {n} must be between 1 and 5"));
            }
        }
        HolidayRule::Computed(_) => {}
        HolidayRule::Derived { base, .. } => {
            if *base == def.holiday {
                return bad("derived rule refers back to itself".into());
            }
        }
    }
    Ok(())
}

/// The `n`-th `weekday` of a month: first occurrence on/after the 1st, plus `n - 1` weeks.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days_ahead = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let date = first + Duration::days(i64::from(days_ahead + 7 * (n - 1)));
    (date.month() == month).then_some(date)
}

/// The `n`-th last `weekday` of a month: last occurrence on/before the month's final day, minus `n - 1` weeks.
pub fn nth_last_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let last = last_day_of_month(year, month)?;
    let days_back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    let date = last - Duration::days(i64::from(days_back + 7 * (n - 1)));
    (date.month() == month).then_some(date)
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt()
}

/// Gregorian Easter Sunday (anonymous computus). `None` before 1583.
pub fn easter(year: i32) -> Option<NaiveDate> {
    if year < 1583 {
        return None;
    }
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
