//! Data types produced by the assignment and aggregation stages.

use chrono::NaiveDate;
use serde::Serialize;

use crate::holidays::{Holiday, WindowTag};
use crate::ingest::DailyRecord;

/// A daily record with the holiday week it falls in, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignedRecord {
    pub record: DailyRecord,
    pub tag: Option<WindowTag>,
}

impl AssignedRecord {
    pub fn is_assigned(&self) -> bool {
        self.tag.is_some()
    }
}

/// Flat row of the enhanced per-day table.
#[derive(Debug, Serialize)]
pub struct EnhancedRow {
    pub date: NaiveDate,
    pub passenger_count: u64,
    pub holiday_name: Option<Holiday>,
    pub year: Option<i32>,
}

impl From<&AssignedRecord> for EnhancedRow {
    fn from(a: &AssignedRecord) -> Self {
        Self {
            date: a.record.date,
            passenger_count: a.record.passenger_count,
            holiday_name: a.tag.map(|t| t.holiday),
            year: a.tag.map(|t| t.year),
        }
    }
}

/// Average daily volume over the days present in one holiday week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverage {
    pub holiday_name: Holiday,
    pub year: i32,
    pub average_daily_count: f64,
    /// 1–7; fewer than 7 for partial weeks at the edges of the data.
    pub days_present: u32,
    pub total_count: u64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl WeeklyAverage {
    pub fn tag(&self) -> WindowTag {
        WindowTag::new(self.holiday_name, self.year)
    }

    pub fn is_partial(&self) -> bool {
        self.days_present < 7
    }
}
