use std::collections::BTreeMap;

use crate::analyzers::types::{AssignedRecord, WeeklyAverage};
use crate::holidays::WindowTag;

#[derive(Default)]
struct WeekAccumulator {
    total: u64,
    days: u32,
    first: Option<chrono::NaiveDate>,
    last: Option<chrono::NaiveDate>,
}

impl WeekAccumulator {
    fn push(&mut self, record: &AssignedRecord) {
        let date = record.record.date;
        self.total += record.record.passenger_count;
        self.days += 1;
        self.first = Some(self.first.map_or(date, |d| d.min(date)));
        self.last = Some(self.last.map_or(date, |d| d.max(date)));
    }
}

/// Groups assigned records by holiday week and averages each group over the
/// days actually present.
///
/// Unassigned records are skipped. Output is ordered by holiday, then year.
pub fn aggregate(assigned: &[AssignedRecord]) -> Vec<WeeklyAverage> {
    let mut groups: BTreeMap<WindowTag, WeekAccumulator> = BTreeMap::new();

    for record in assigned {
        if let Some(tag) = record.tag {
            groups.entry(tag).or_default().push(record);
        }
    }

    groups
        .into_iter()
        .filter_map(|(tag, acc)| {
            let (first_date, last_date) = (acc.first?, acc.last?);
            Some(WeeklyAverage {
                holiday_name: tag.holiday,
                year: tag.year,
                average_daily_count: acc.total as f64 / f64::from(acc.days),
                days_present: acc.days,
                total_count: acc.total,
                first_date,
                last_date,
            })
        })
        .collect()
}
