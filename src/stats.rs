use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::types::{AssignedRecord, WeeklyAverage};
use crate::error::RecordWarning;
use crate::ingest::IngestedData;

/// Data-quality summary of a run, reported alongside the outputs.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub total_records: usize,
    pub assigned_records: usize,
    pub unassigned_records: usize,
    pub holiday_weeks: usize,
    pub partial_weeks: usize,
    pub windows_considered: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub warnings: Vec<RecordWarning>,
}

impl RunSummary {
    pub fn from_run(
        data: &IngestedData,
        assigned: &[AssignedRecord],
        averages: &[WeeklyAverage],
        windows_considered: usize,
    ) -> Self {
        let assigned_records = assigned.iter().filter(|a| a.is_assigned()).count();
        let range = data.date_range();

        RunSummary {
            rows_read: data.rows_read,
            total_records: assigned.len(),
            assigned_records,
            unassigned_records: assigned.len() - assigned_records,
            holiday_weeks: averages.len(),
            partial_weeks: averages.iter().filter(|w| w.is_partial()).count(),
            windows_considered,
            first_date: range.map(|(first, _)| first),
            last_date: range.map(|(_, last)| last),
            warnings: data.warnings.clone(),
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn assigned_pct(&self) -> f64 {
        Self::pct(self.assigned_records, self.total_records)
    }
}
