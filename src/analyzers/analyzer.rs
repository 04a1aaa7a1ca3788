use chrono::{Datelike, NaiveDate};
use std::path::Path;
use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::assign::{WindowIndex, assign};
use crate::analyzers::types::{AssignedRecord, WeeklyAverage};
use crate::analyzers::views::{self, CalendarWeekPoint, Heatmap, LineChart};
use crate::config::Settings;
use crate::error::Result;
use crate::holidays::{HolidayCalendar, HolidayWindow, WeekWindowResolver};
use crate::ingest::{IngestedData, load_daily_records};
use crate::output;
use crate::stats::RunSummary;

/// Everything derived from one pass over the daily records.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub index: WindowIndex,
    pub assigned: Vec<AssignedRecord>,
    pub averages: Vec<WeeklyAverage>,
    pub heatmap: Heatmap,
    pub line_chart: LineChart,
    pub calendar_weeks: Vec<CalendarWeekPoint>,
    pub summary: RunSummary,
}

/// Windows that intersect `[first, last]`.
///
/// Years one either side of the range are resolved too, so a New Year week
/// starting in late December of the last year is still found.
pub fn relevant_windows(
    calendar: &HolidayCalendar,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<Vec<HolidayWindow>> {
    let resolver = WeekWindowResolver::new(calendar);
    let windows = resolver.windows_for_years(first.year() - 1..=last.year() + 1)?;
    Ok(windows
        .into_iter()
        .filter(|w| w.overlaps(first, last))
        .collect())
}

/// Resolves windows, assigns records, aggregates and builds the views.
///
/// # Errors
///
/// Fails on configuration-level problems: unresolvable holidays or windows
/// that overlap inside the data's date range.
#[tracing::instrument(skip_all, fields(records = data.records.len()))]
pub fn run(data: &IngestedData, settings: &Settings) -> Result<Analysis> {
    let calendar = &settings.calendar;

    let windows = match data.date_range() {
        Some((first, last)) => relevant_windows(calendar, first, last)?,
        None => Vec::new(),
    };
    let windows_considered = windows.len();
    let index = WindowIndex::build(windows)?;

    let assigned = assign(&data.records, &index);
    let averages = aggregate(&assigned);

    let heatmap = views::heatmap(&averages, calendar)?;
    let line_chart = views::line_chart(&averages, calendar, &settings.presentation);
    let calendar_weeks = views::calendar_weeks(&averages, &index);

    let summary = RunSummary::from_run(data, &assigned, &averages, windows_considered);
    info!(
        windows = windows_considered,
        holiday_weeks = averages.len(),
        "Aggregated holiday weeks"
    );

    Ok(Analysis {
        index,
        assigned,
        averages,
        heatmap,
        line_chart,
        calendar_weeks,
        summary,
    })
}

/// Loads `input`, runs the analysis and writes every output table into `output_dir`.
#[tracing::instrument(skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
pub fn analyze(input: &Path, output_dir: &Path, settings: &Settings) -> Result<Analysis> {
    let data = load_daily_records(input)?;
    let analysis = run(&data, settings)?;

    std::fs::create_dir_all(output_dir)?;
    output::write_enhanced_data(&output_dir.join(output::ENHANCED_DATA_FILE), &analysis.assigned)?;
    output::write_weekly_averages(
        &output_dir.join(output::WEEKLY_AVERAGES_FILE),
        &analysis.averages,
    )?;
    output::write_heatmap(&output_dir.join(output::HEATMAP_FILE), &analysis.heatmap)?;
    output::write_calendar_weeks(
        &output_dir.join(output::CALENDAR_WEEKS_FILE),
        &analysis.calendar_weeks,
    )?;
    output::write_json(&output_dir.join(output::CHART_DATA_FILE), &analysis.line_chart)?;
    output::write_json(&output_dir.join(output::RUN_SUMMARY_FILE), &analysis.summary)?;
    info!(output_dir = %output_dir.display(), "Outputs written");

    output::print_summary(&analysis.summary);
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HolidayError;
    use crate::holidays::{Holiday, HolidayDefinition, HolidayRule, WindowTag};
    use crate::ingest::DailyRecord;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(first: NaiveDate, last: NaiveDate) -> IngestedData {
        let records: Vec<_> = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| DailyRecord::new(d, 1_000 + u64::from(d.ordinal())))
            .collect();
        IngestedData {
            rows_read: records.len(),
            records,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_relevant_windows_include_boundary_weeks() {
        let cal = HolidayCalendar::us_travel();
        let windows = relevant_windows(&cal, ymd(2024, 12, 2), ymd(2024, 12, 31)).unwrap();
        let tags: Vec<_> = windows.iter().map(|w| w.tag()).collect();
        assert_eq!(
            tags,
            vec![
                WindowTag::new(Holiday::BlackFriday, 2024),
                WindowTag::new(Holiday::Christmas, 2024),
                WindowTag::new(Holiday::NewYear, 2025),
            ]
        );
    }

    #[test]
    fn test_run_counts_full_and_partial_weeks() {
        // Thanksgiving 2025 week is Nov 24–30; Black Friday week Dec 1–7.
        let data = daily(ymd(2025, 11, 1), ymd(2025, 12, 4));
        let analysis = run(&data, &Settings::default()).unwrap();

        let weeks: Vec<_> = analysis
            .averages
            .iter()
            .map(|w| (w.holiday_name, w.year, w.days_present))
            .collect();
        assert_eq!(
            weeks,
            vec![
                (Holiday::Halloween, 2025, 2),
                (Holiday::VeteransDay, 2025, 7),
                (Holiday::Thanksgiving, 2025, 7),
                (Holiday::BlackFriday, 2025, 4),
            ]
        );
        assert_eq!(analysis.summary.total_records, 34);
        assert_eq!(analysis.summary.assigned_records, 20);
        assert_eq!(analysis.summary.unassigned_records, 14);
        assert_eq!(analysis.summary.partial_weeks, 2);
    }

    #[test]
    fn test_run_does_not_assume_sorted_records() {
        let data = IngestedData {
            records: vec![
                DailyRecord::new(ymd(2024, 12, 24), 300),
                DailyRecord::new(ymd(2024, 7, 4), 200),
            ],
            warnings: Vec::new(),
            rows_read: 2,
        };
        let analysis = run(&data, &Settings::default()).unwrap();

        let tags: Vec<_> = analysis.averages.iter().map(|w| w.tag()).collect();
        assert_eq!(
            tags,
            vec![
                WindowTag::new(Holiday::IndependenceDay, 2024),
                WindowTag::new(Holiday::Christmas, 2024),
            ]
        );
        assert_eq!(analysis.summary.assigned_records, 2);
        assert_eq!(analysis.summary.first_date, Some(ymd(2024, 7, 4)));
        assert_eq!(analysis.summary.last_date, Some(ymd(2024, 12, 24)));
    }

    #[test]
    fn test_run_on_empty_input() {
        let analysis = run(&IngestedData::default(), &Settings::default()).unwrap();
        assert!(analysis.averages.is_empty());
        assert!(analysis.index.is_empty());
        assert_eq!(analysis.summary.total_records, 0);
        assert!(analysis.heatmap.rows.is_empty());
    }

    #[test]
    fn test_overlap_inside_data_range_aborts() {
        let data = daily(ymd(2008, 3, 1), ymd(2008, 3, 31));
        assert!(matches!(
            run(&data, &Settings::default()),
            Err(HolidayError::OverlappingWindow { .. })
        ));
    }

    #[test]
    fn test_overlap_outside_data_range_is_ignored() {
        // Memorial Day 2008 week ends June 1.
        let data = daily(ymd(2008, 6, 2), ymd(2008, 7, 31));
        let analysis = run(&data, &Settings::default()).unwrap();
        assert_eq!(analysis.averages.len(), 1);
        assert_eq!(analysis.averages[0].holiday_name, Holiday::IndependenceDay);
    }

    #[test]
    fn test_custom_calendar_is_used() {
        let settings = Settings {
            calendar: HolidayCalendar::new(vec![HolidayDefinition::new(
                Holiday::SpringBreak,
                HolidayRule::Fixed { month: 3, day: 10 },
            )])
            .unwrap(),
            ..Settings::default()
        };
        let data = daily(ymd(2024, 3, 1), ymd(2024, 3, 31));
        let analysis = run(&data, &settings).unwrap();
        assert_eq!(analysis.averages.len(), 1);
        // March 10, 2024 is a Sunday: week of March 4–10.
        assert_eq!(analysis.averages[0].first_date, ymd(2024, 3, 4));
        assert_eq!(analysis.averages[0].last_date, ymd(2024, 3, 10));
    }
}
