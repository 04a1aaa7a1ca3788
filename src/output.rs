//! Output tables and summary reporting.
//!
//! Tables are comma-separated with a header row; chart data and the run
//! summary are pretty-printed JSON.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::analyzers::types::{AssignedRecord, EnhancedRow, WeeklyAverage};
use crate::analyzers::views::{CalendarWeekPoint, Heatmap};
use crate::error::Result;
use crate::stats::RunSummary;

pub const ENHANCED_DATA_FILE: &str = "enhanced_data.csv";
pub const WEEKLY_AVERAGES_FILE: &str = "weekly_averages.csv";
pub const HEATMAP_FILE: &str = "heatmap.csv";
pub const CALENDAR_WEEKS_FILE: &str = "calendar_weeks.csv";
pub const CHART_DATA_FILE: &str = "chart_data.json";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Writes serializable rows to a new CSV file, replacing any existing one.
pub fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = count, "Wrote CSV");
    Ok(count)
}

/// Per-day table: input columns plus `holiday_name` and holiday `year`.
pub fn write_enhanced_data(path: &Path, assigned: &[AssignedRecord]) -> Result<usize> {
    write_csv(path, assigned.iter().map(EnhancedRow::from))
}

pub fn write_weekly_averages(path: &Path, averages: &[WeeklyAverage]) -> Result<usize> {
    write_csv(path, averages)
}

pub fn write_calendar_weeks(path: &Path, points: &[CalendarWeekPoint]) -> Result<usize> {
    write_csv(path, points)
}

/// Writes the pivot with one column per year. Empty cells have no data.
pub fn write_heatmap(path: &Path, heatmap: &Heatmap) -> Result<usize> {
    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut header = vec!["holiday_name".to_string()];
    header.extend(heatmap.years.iter().map(i32::to_string));
    writer.write_record(&header)?;

    for row in &heatmap.rows {
        let mut record = vec![row.holiday.name().to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| format!("{v:.2}")).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(heatmap.rows.len())
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// Logs the run summary: record counts and any data-quality warnings.
pub fn print_summary(summary: &RunSummary) {
    info!(
        total = summary.total_records,
        assigned = summary.assigned_records,
        unassigned = summary.unassigned_records,
        assigned_pct = summary.assigned_pct(),
        holiday_weeks = summary.holiday_weeks,
        partial_weeks = summary.partial_weeks,
        "{} of {} records assigned to holiday weeks",
        summary.assigned_records,
        summary.total_records,
    );
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        info!(%first, %last, "Date range");
    }
    if !summary.warnings.is_empty() {
        warn!(
            count = summary.warnings.len(),
            "Records dropped or replaced during ingest"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::views::HeatmapRow;
    use crate::holidays::{Holiday, WindowTag};
    use crate::ingest::DailyRecord;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        print_summary(&RunSummary::default());
    }

    #[test]
    fn test_enhanced_data_leaves_unassigned_blank() {
        let path = temp_path("holiday_weeks_test_enhanced.csv");
        let _ = fs::remove_file(&path);

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let assigned = vec![
            AssignedRecord {
                record: DailyRecord::new(date, 2_500_000),
                tag: Some(WindowTag::new(Holiday::NewYear, 2025)),
            },
            AssignedRecord {
                record: DailyRecord::new(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(), 7),
                tag: None,
            },
        ];
        assert_eq!(write_enhanced_data(&path, &assigned).unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "date,passenger_count,holiday_name,year");
        assert_eq!(lines[1], "2024-12-31,2500000,New Year Holiday,2025");
        assert_eq!(lines[2], "2024-08-01,7,,");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_heatmap_layout() {
        let path = temp_path("holiday_weeks_test_heatmap.csv");
        let heatmap = Heatmap {
            years: vec![2023, 2024],
            rows: vec![HeatmapRow {
                holiday: Holiday::Thanksgiving,
                values: vec![Some(2_000_000.0), None],
            }],
        };
        write_heatmap(&path, &heatmap).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "holiday_name,2023,2024\nThanksgiving,2000000.00,\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_summary() {
        let path = temp_path("holiday_weeks_test_summary.json");
        write_json(&path, &RunSummary::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_records"], 0);
        assert!(value["warnings"].as_array().unwrap().is_empty());

        fs::remove_file(&path).unwrap();
    }
}
