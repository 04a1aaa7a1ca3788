//! Daily passenger-count CSV ingest.
//!
//! Expects a header row with a `date` column and a `passenger_count` (or
//! `passengers`) column. Other columns are ignored. Bad rows are dropped and
//! reported as [`RecordWarning`]s; only a missing header aborts the load.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{HolidayError, RecordWarning, Result};

const DATE_COLUMN: &str = "date";
const COUNT_COLUMNS: [&str; 2] = ["passenger_count", "passengers"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// One day of passenger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub passenger_count: u64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, passenger_count: u64) -> Self {
        Self {
            date,
            passenger_count,
        }
    }
}

/// Ingest output: one record per date, sorted, plus what was dropped or replaced.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub records: Vec<DailyRecord>,
    pub warnings: Vec<RecordWarning>,
    pub rows_read: usize,
}

impl IngestedData {
    /// Earliest and latest record dates. Does not assume `records` is sorted.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

/// Opens `path` and reads it with [`read_daily_records`].
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_daily_records(path: &Path) -> Result<IngestedData> {
    let file = File::open(path)?;
    let data = read_daily_records(file)?;
    info!(
        rows_read = data.rows_read,
        records = data.records.len(),
        warnings = data.warnings.len(),
        "Loaded daily records"
    );
    Ok(data)
}

/// Reads daily records from CSV text.
///
/// Duplicate dates keep the last row seen.
pub fn read_daily_records<R: Read>(reader: R) -> Result<IngestedData> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, &[DATE_COLUMN])
        .ok_or_else(|| HolidayError::Config(format!("missing required column '{DATE_COLUMN}'")))?;
    let count_idx = column_index(&headers, &COUNT_COLUMNS).ok_or_else(|| {
        HolidayError::Config(format!(
            "missing required column, expected one of {COUNT_COLUMNS:?}"
        ))
    })?;

    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut rows_read = 0;

    for (i, result) in rdr.records().enumerate() {
        rows_read += 1;
        // Header is line 1.
        let mut line = i + 2;

        let parsed = result.map_err(|e| e.to_string()).and_then(|row| {
            if let Some(pos) = row.position() {
                line = pos.line() as usize;
            }
            parse_row(&row, date_idx, count_idx)
        });

        match parsed {
            Ok(record) => {
                if by_date.insert(record.date, record.passenger_count).is_some() {
                    let warning = RecordWarning::DuplicateDate {
                        date: record.date,
                        line,
                    };
                    warn!(%warning, "Duplicate date");
                    warnings.push(warning);
                }
            }
            Err(reason) => {
                let warning = RecordWarning::Malformed { line, reason };
                warn!(%warning, "Dropping record");
                warnings.push(warning);
            }
        }
    }

    let records: Vec<DailyRecord> = by_date
        .into_iter()
        .map(|(date, count)| DailyRecord::new(date, count))
        .collect();
    debug!(rows_read, kept = records.len(), "Parsed daily CSV");

    Ok(IngestedData {
        records,
        warnings,
        rows_read,
    })
}

fn column_index(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

fn parse_row(row: &StringRecord, date_idx: usize, count_idx: usize) -> std::result::Result<DailyRecord, String> {
    let raw_date = row.get(date_idx).unwrap_or_default();
    let raw_count = row.get(count_idx).unwrap_or_default();

    let date = parse_date(raw_date).ok_or_else(|| format!("unparseable date '{raw_date}'"))?;
    let passenger_count = parse_count(raw_count)?;
    Ok(DailyRecord::new(date, passenger_count))
}

/// Parses `YYYY-MM-DD` or `MM/DD/YYYY`, ignoring any trailing time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day_part = raw.split(['T', ' ']).next().unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
}

/// Parses a non-negative integer count; thousands separators are allowed.
pub fn parse_count(raw: &str) -> std::result::Result<u64, String> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err("missing passenger count".into());
    }
    match cleaned.parse::<i64>() {
        Ok(n) if n < 0 => Err(format!("negative passenger count {n}")),
        Ok(n) => Ok(n as u64),
        Err(_) => Err(format!("non-numeric passenger count '{raw}'")),
    }
}
