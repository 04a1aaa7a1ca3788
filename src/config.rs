//! Run settings: the holiday set and presentation options.
//!
//! Stored as a JSON object on disk. Every section is optional:
//! ```json
//! {
//!   "holidays": [
//!     { "name": "New Year Holiday" },
//!     { "name": "Spring Break", "rule": { "type": "fixed", "month": 3, "day": 20 } },
//!     { "name": "Thanksgiving", "rule": { "type": "nth_weekday", "month": 11, "weekday": "Thu", "n": 4 } },
//!     { "name": "Black Friday", "rule": { "type": "derived", "base": "Thanksgiving", "week_offset": 1 } }
//!   ],
//!   "presentation": { "title": "Average Daily Passengers", "year_colors": { "2024": "#8c564b" } }
//! }
//! ```
//! A holiday listed without a `rule` uses its built-in rule.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{HolidayError, Result};
use crate::holidays::{ComputedRule, Holiday, HolidayCalendar, HolidayDefinition, HolidayRule};

/// Immutable settings built once at startup and passed to each stage.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub calendar: HolidayCalendar,
    pub presentation: Presentation,
}

impl Settings {
    /// Loads settings from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading settings");
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: SettingsFile = serde_json::from_str(content)?;
        file.into_settings()
    }
}

/// Chart options handed through to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub figure_size: [f64; 2],
    pub dpi: u32,
    pub line_width: f64,
    pub marker_size: f64,
    pub grid: bool,
    pub legend_loc: String,
    pub year_colors: BTreeMap<i32, String>,
}

const FALLBACK_COLOR: &str = "#000000";

impl Presentation {
    pub fn color_for(&self, year: i32) -> &str {
        self.year_colors
            .get(&year)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for Presentation {
    fn default() -> Self {
        let year_colors = [
            (2019, "#1f77b4"),
            (2020, "#ff7f0e"),
            (2021, "#2ca02c"),
            (2022, "#d62728"),
            (2023, "#9467bd"),
            (2024, "#8c564b"),
            (2025, "#e377c2"),
        ]
        .into_iter()
        .map(|(y, c)| (y, c.to_string()))
        .collect();

        Self {
            title: "Average Daily Passengers by Holiday Week".into(),
            xlabel: "Holiday Week".into(),
            ylabel: "Average Daily Passengers".into(),
            figure_size: [14.0, 8.0],
            dpi: 300,
            line_width: 2.0,
            marker_size: 8.0,
            grid: true,
            legend_loc: "best".into(),
            year_colors,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    holidays: Option<Vec<HolidayEntry>>,
    #[serde(default)]
    presentation: Presentation,
}

#[derive(Debug, Deserialize)]
struct HolidayEntry {
    name: String,
    #[serde(default)]
    rule: Option<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RuleEntry {
    Fixed {
        month: u32,
        day: u32,
    },
    NthWeekday {
        month: u32,
        weekday: Weekday,
        n: u32,
        #[serde(default)]
        from_end: bool,
    },
    LastWeekday {
        month: u32,
        weekday: Weekday,
    },
    Easter,
    Derived {
        base: String,
        #[serde(default = "one_week")]
        week_offset: i32,
    },
}

fn one_week() -> i32 {
    1
}

impl RuleEntry {
    fn into_rule(self) -> Result<HolidayRule> {
        Ok(match self {
            RuleEntry::Fixed { month, day } => HolidayRule::Fixed { month, day },
            RuleEntry::NthWeekday {
                month,
                weekday,
                n,
                from_end,
            } => HolidayRule::NthWeekday {
                month,
                weekday,
                n,
                from_end,
            },
            RuleEntry::LastWeekday { month, weekday } => HolidayRule::last(month, weekday),
            RuleEntry::Easter => HolidayRule::Computed(ComputedRule::Easter),
            RuleEntry::Derived { base, week_offset } => HolidayRule::Derived {
                base: base.parse::<Holiday>()?,
                week_offset,
            },
        })
    }
}

impl SettingsFile {
    fn into_settings(self) -> Result<Settings> {
        let calendar = match self.holidays {
            None => HolidayCalendar::us_travel(),
            Some(entries) if entries.is_empty() => {
                return Err(HolidayError::Config("holiday list is empty".into()));
            }
            Some(entries) => {
                let definitions = entries
                    .into_iter()
                    .map(|entry| -> Result<HolidayDefinition> {
                        let holiday: Holiday = entry.name.parse()?;
                        let rule = match entry.rule {
                            Some(rule) => rule.into_rule()?,
                            None => holiday.default_rule(),
                        };
                        Ok(HolidayDefinition::new(holiday, rule))
                    })
                    .collect::<Result<Vec<_>>>()?;
                HolidayCalendar::new(definitions)?
            }
        };

        Ok(Settings {
            calendar,
            presentation: self.presentation,
        })
    }
}
