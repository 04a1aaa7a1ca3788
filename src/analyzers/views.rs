//! Presentation-ready views of the weekly averages.
//!
//! - heatmap: holiday × year, rows in anchor-date order
//! - line chart: one series per year, categories in definition order
//! - calendar weeks: each holiday week placed on its ISO week

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::analyzers::assign::WindowIndex;
use crate::analyzers::calendar_week::iso_week_of;
use crate::analyzers::types::WeeklyAverage;
use crate::config::Presentation;
use crate::error::Result;
use crate::holidays::{Holiday, HolidayCalendar, WeekWindowResolver, WindowTag};

fn by_tag(averages: &[WeeklyAverage]) -> HashMap<WindowTag, f64> {
    averages
        .iter()
        .map(|w| (w.tag(), w.average_daily_count))
        .collect()
}

fn years_of(averages: &[WeeklyAverage]) -> Vec<i32> {
    averages
        .iter()
        .map(|w| w.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Holidays that have at least one average, in definition order.
fn present_holidays(averages: &[WeeklyAverage], calendar: &HolidayCalendar) -> Vec<Holiday> {
    calendar
        .holidays()
        .filter(|h| averages.iter().any(|w| w.holiday_name == *h))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub holiday: Holiday,
    /// One cell per entry of [`Heatmap::years`].
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub years: Vec<i32>,
    pub rows: Vec<HeatmapRow>,
}

/// Pivots averages into holiday rows and year columns.
///
/// Rows follow the anchor dates of the earliest year present.
pub fn heatmap(averages: &[WeeklyAverage], calendar: &HolidayCalendar) -> Result<Heatmap> {
    let years = years_of(averages);
    let cells = by_tag(averages);
    let mut holidays = present_holidays(averages, calendar);

    if let Some(&first_year) = years.first() {
        let resolver = WeekWindowResolver::new(calendar);
        let anchors = holidays
            .iter()
            .map(|h| -> Result<(Holiday, NaiveDate)> {
                Ok((*h, resolver.window_for(*h, first_year)?.anchor))
            })
            .collect::<Result<HashMap<Holiday, NaiveDate>>>()?;
        holidays.sort_by_key(|h| anchors[h]);
    }

    let rows = holidays
        .into_iter()
        .map(|holiday| HeatmapRow {
            holiday,
            values: years
                .iter()
                .map(|y| cells.get(&WindowTag::new(holiday, *y)).copied())
                .collect(),
        })
        .collect();

    Ok(Heatmap { years, rows })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub year: i32,
    pub color: String,
    /// One value per category; `None` where the year has no data.
    pub values: Vec<Option<f64>>,
}

/// Everything the external renderer needs for the year-over-year line plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub figure_size: [f64; 2],
    pub dpi: u32,
    pub line_width: f64,
    pub marker_size: f64,
    pub grid: bool,
    pub legend_loc: String,
    pub categories: Vec<Holiday>,
    pub series: Vec<ChartSeries>,
}

pub fn line_chart(
    averages: &[WeeklyAverage],
    calendar: &HolidayCalendar,
    presentation: &Presentation,
) -> LineChart {
    let categories = present_holidays(averages, calendar);
    let cells = by_tag(averages);

    let series = years_of(averages)
        .into_iter()
        .map(|year| ChartSeries {
            year,
            color: presentation.color_for(year).to_string(),
            values: categories
                .iter()
                .map(|h| cells.get(&WindowTag::new(*h, year)).copied())
                .collect(),
        })
        .collect();

    LineChart {
        title: presentation.title.clone(),
        xlabel: presentation.xlabel.clone(),
        ylabel: presentation.ylabel.clone(),
        figure_size: presentation.figure_size,
        dpi: presentation.dpi,
        line_width: presentation.line_width,
        marker_size: presentation.marker_size,
        grid: presentation.grid,
        legend_loc: presentation.legend_loc.clone(),
        categories,
        series,
    }
}

/// A holiday week placed on the ISO calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarWeekPoint {
    pub holiday_name: Holiday,
    pub year: i32,
    pub window_start: NaiveDate,
    pub iso_year: i32,
    pub iso_week: u32,
    pub average_daily_count: f64,
}

/// Maps each average to the ISO week of its window start, in chronological order.
pub fn calendar_weeks(averages: &[WeeklyAverage], index: &WindowIndex) -> Vec<CalendarWeekPoint> {
    let mut points: Vec<CalendarWeekPoint> = averages
        .iter()
        .filter_map(|avg| {
            let window = index.window(avg.tag())?;
            let iso = iso_week_of(window.start);
            Some(CalendarWeekPoint {
                holiday_name: avg.holiday_name,
                year: avg.year,
                window_start: window.start,
                iso_year: iso.iso_year,
                iso_week: iso.week,
                average_daily_count: avg.average_daily_count,
            })
        })
        .collect();
    points.sort_by_key(|p| p.window_start);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::HolidayDefinition;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn avg(holiday: Holiday, year: i32, value: f64) -> WeeklyAverage {
        WeeklyAverage {
            holiday_name: holiday,
            year,
            average_daily_count: value,
            days_present: 7,
            total_count: (value * 7.0) as u64,
            first_date: ymd(year, 1, 1),
            last_date: ymd(year, 1, 7),
        }
    }

    #[test]
    fn test_heatmap_orders_rows_by_anchor_date() {
        // Definition order puts Christmas first; anchors put it last.
        let cal = HolidayCalendar::new(vec![
            HolidayDefinition::builtin(Holiday::Christmas),
            HolidayDefinition::builtin(Holiday::LaborDay),
            HolidayDefinition::builtin(Holiday::NewYear),
        ])
        .unwrap();
        let averages = vec![
            avg(Holiday::Christmas, 2023, 3.0),
            avg(Holiday::LaborDay, 2024, 2.0),
            avg(Holiday::NewYear, 2023, 1.0),
        ];
        let map = heatmap(&averages, &cal).unwrap();
        assert_eq!(map.years, vec![2023, 2024]);
        let order: Vec<_> = map.rows.iter().map(|r| r.holiday).collect();
        assert_eq!(order, vec![Holiday::NewYear, Holiday::LaborDay, Holiday::Christmas]);
        assert_eq!(map.rows[1].values, vec![None, Some(2.0)]);
        assert_eq!(map.rows[2].values, vec![Some(3.0), None]);
    }

    #[test]
    fn test_line_chart_uses_definition_order_and_palette() {
        let cal = HolidayCalendar::us_travel();
        let averages = vec![
            avg(Holiday::Christmas, 2019, 3.0),
            avg(Holiday::NewYear, 2019, 1.0),
            avg(Holiday::NewYear, 2030, 4.0),
        ];
        let chart = line_chart(&averages, &cal, &Presentation::default());
        assert_eq!(chart.categories, vec![Holiday::NewYear, Holiday::Christmas]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].color, "#1f77b4");
        assert_eq!(chart.series[0].values, vec![Some(1.0), Some(3.0)]);
        assert_eq!(chart.series[1].color, "#000000");
        assert_eq!(chart.series[1].values, vec![Some(4.0), None]);
    }

    #[test]
    fn test_calendar_weeks_sorted_by_window_start() {
        let cal = HolidayCalendar::us_travel();
        let windows = WeekWindowResolver::new(&cal).windows_for_years(2024..=2025).unwrap();
        let index = WindowIndex::build(windows).unwrap();
        let averages = vec![
            avg(Holiday::Christmas, 2024, 3.0),
            avg(Holiday::NewYear, 2025, 2.0),
            avg(Holiday::NewYear, 2024, 1.0),
        ];
        let points = calendar_weeks(&averages, &index);
        let tags: Vec<_> = points.iter().map(|p| (p.holiday_name, p.year)).collect();
        assert_eq!(
            tags,
            vec![
                (Holiday::NewYear, 2024),
                (Holiday::Christmas, 2024),
                (Holiday::NewYear, 2025)
            ]
        );
        assert_eq!((points[1].iso_year, points[1].iso_week), (2024, 52));
        assert_eq!((points[2].iso_year, points[2].iso_week), (2025, 1));
        assert_eq!(points[2].window_start, ymd(2024, 12, 30));
    }
}
