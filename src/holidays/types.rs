//! Holiday identifiers and the rules that place them in a year.

use chrono::Weekday;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::HolidayError;

/// The 14 US travel holidays a run can be aligned to.
///
/// Declaration order is the canonical definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Holiday {
    NewYear,
    MlkDay,
    PresidentsDay,
    SpringBreak,
    Easter,
    MemorialDay,
    IndependenceDay,
    LaborDay,
    ColumbusDay,
    Halloween,
    VeteransDay,
    Thanksgiving,
    BlackFriday,
    Christmas,
}

impl Holiday {
    pub const ALL: [Holiday; 14] = [
        Holiday::NewYear,
        Holiday::MlkDay,
        Holiday::PresidentsDay,
        Holiday::SpringBreak,
        Holiday::Easter,
        Holiday::MemorialDay,
        Holiday::IndependenceDay,
        Holiday::LaborDay,
        Holiday::ColumbusDay,
        Holiday::Halloween,
        Holiday::VeteransDay,
        Holiday::Thanksgiving,
        Holiday::BlackFriday,
        Holiday::Christmas,
    ];

    /// Display name used in config files and output tables.
    pub fn name(self) -> &'static str {
        match self {
            Holiday::NewYear => "New Year Holiday",
            Holiday::MlkDay => "MLK Jr. Day",
            Holiday::PresidentsDay => "Presidents Day",
            Holiday::SpringBreak => "Spring Break",
            Holiday::Easter => "Easter/Spring Holiday",
            Holiday::MemorialDay => "Memorial Day",
            Holiday::IndependenceDay => "July 4th Independence Day",
            Holiday::LaborDay => "Labor Day",
            Holiday::ColumbusDay => "Columbus Day",
            Holiday::Halloween => "Halloween",
            Holiday::VeteransDay => "Veterans Day",
            Holiday::Thanksgiving => "Thanksgiving",
            Holiday::BlackFriday => "Black Friday",
            Holiday::Christmas => "Christmas Holiday",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Holiday::NewYear => &["New Year", "New Year's Day"],
            Holiday::MlkDay => &["MLK Day", "Martin Luther King Jr. Day"],
            Holiday::Easter => &["Easter"],
            Holiday::IndependenceDay => &["Independence Day", "July 4th"],
            Holiday::Christmas => &["Christmas"],
            _ => &[],
        }
    }

    /// The rule used when a configuration does not override it.
    pub fn default_rule(self) -> HolidayRule {
        use Weekday::{Mon, Thu};
        match self {
            Holiday::NewYear => HolidayRule::Fixed { month: 1, day: 1 },
            Holiday::MlkDay => HolidayRule::nth(1, Mon, 3),
            Holiday::PresidentsDay => HolidayRule::nth(2, Mon, 3),
            Holiday::SpringBreak => HolidayRule::Fixed { month: 3, day: 20 },
            Holiday::Easter => HolidayRule::Computed(ComputedRule::Easter),
            Holiday::MemorialDay => HolidayRule::last(5, Mon),
            Holiday::IndependenceDay => HolidayRule::Fixed { month: 7, day: 4 },
            Holiday::LaborDay => HolidayRule::nth(9, Mon, 1),
            Holiday::ColumbusDay => HolidayRule::nth(10, Mon, 2),
            Holiday::Halloween => HolidayRule::Fixed { month: 10, day: 31 },
            Holiday::VeteransDay => HolidayRule::Fixed { month: 11, day: 11 },
            Holiday::Thanksgiving => HolidayRule::nth(11, Thu, 4),
            Holiday::BlackFriday => HolidayRule::Derived {
                base: Holiday::Thanksgiving,
                week_offset: 1,
            },
            Holiday::Christmas => HolidayRule::Fixed { month: 12, day: 25 },
        }
    }
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Holiday {
    type Err = HolidayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Holiday::ALL
            .into_iter()
            .find(|h| {
                h.name().eq_ignore_ascii_case(wanted)
                    || h.aliases().iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| HolidayError::UnknownHoliday(wanted.to_string()))
    }
}

impl Serialize for Holiday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Algorithms that compute an anchor date from the year alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedRule {
    /// Western (Gregorian) Easter Sunday.
    Easter,
}

/// How a holiday's anchor date is found in a given year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayRule {
    Fixed {
        month: u32,
        day: u32,
    },
    /// The `n`-th `weekday` of `month`, counted from the end when `from_end` is set.
    NthWeekday {
        month: u32,
        weekday: Weekday,
        n: u32,
        from_end: bool,
    },
    Computed(ComputedRule),
    /// The window of `base`, moved by whole weeks.
    Derived { base: Holiday, week_offset: i32 },
}

impl HolidayRule {
    pub fn nth(month: u32, weekday: Weekday, n: u32) -> Self {
        HolidayRule::NthWeekday {
            month,
            weekday,
            n,
            from_end: false,
        }
    }

    pub fn last(month: u32, weekday: Weekday) -> Self {
        HolidayRule::NthWeekday {
            month,
            weekday,
            n: 1,
            from_end: true,
        }
    }
}

/// A holiday together with the rule that resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayDefinition {
    pub holiday: Holiday,
    pub rule: HolidayRule,
}

impl HolidayDefinition {
    pub fn new(holiday: Holiday, rule: HolidayRule) -> Self {
        Self { holiday, rule }
    }

    pub fn builtin(holiday: Holiday) -> Self {
        Self::new(holiday, holiday.default_rule())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names_and_aliases() {
        for h in Holiday::ALL {
            assert_eq!(h.name().parse::<Holiday>().unwrap(), h);
        }
        assert_eq!("MLK Day".parse::<Holiday>().unwrap(), Holiday::MlkDay);
        assert_eq!("christmas".parse::<Holiday>().unwrap(), Holiday::Christmas);
        assert_eq!(
            " Independence Day ".parse::<Holiday>().unwrap(),
            Holiday::IndependenceDay
        );
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "Groundhog Day".parse::<Holiday>().unwrap_err();
        assert!(matches!(err, HolidayError::UnknownHoliday(ref n) if n == "Groundhog Day"));
    }

    #[test]
    fn test_black_friday_derives_from_thanksgiving() {
        assert_eq!(
            Holiday::BlackFriday.default_rule(),
            HolidayRule::Derived {
                base: Holiday::Thanksgiving,
                week_offset: 1
            }
        );
    }

    #[test]
    fn test_serializes_as_display_name() {
        let json = serde_json::to_string(&Holiday::IndependenceDay).unwrap();
        assert_eq!(json, "\"July 4th Independence Day\"");
    }
}
