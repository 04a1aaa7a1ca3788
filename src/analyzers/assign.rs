//! Tagging daily records with the holiday week that contains them.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

use crate::analyzers::types::AssignedRecord;
use crate::error::{HolidayError, Result};
use crate::holidays::{HolidayWindow, WindowTag};
use crate::ingest::DailyRecord;

/// Date → holiday-week lookup built once per run by expanding every window
/// into its seven dates.
#[derive(Debug, Clone, Default)]
pub struct WindowIndex {
    by_date: HashMap<NaiveDate, WindowTag>,
    windows: Vec<HolidayWindow>,
}

impl WindowIndex {
    /// # Errors
    ///
    /// [`HolidayError::OverlappingWindow`] if two different holiday weeks
    /// claim the same date.
    pub fn build(windows: Vec<HolidayWindow>) -> Result<Self> {
        let mut by_date = HashMap::with_capacity(windows.len() * 7);

        for window in &windows {
            let tag = window.tag();
            for date in window.dates() {
                match by_date.entry(date) {
                    Entry::Vacant(slot) => {
                        slot.insert(tag);
                    }
                    Entry::Occupied(slot) if *slot.get() != tag => {
                        return Err(HolidayError::OverlappingWindow {
                            date,
                            first: *slot.get(),
                            second: tag,
                        });
                    }
                    Entry::Occupied(_) => {}
                }
            }
        }

        debug!(windows = windows.len(), dates = by_date.len(), "Built window index");
        Ok(Self { by_date, windows })
    }

    pub fn lookup(&self, date: NaiveDate) -> Option<WindowTag> {
        self.by_date.get(&date).copied()
    }

    pub fn window(&self, tag: WindowTag) -> Option<&HolidayWindow> {
        self.windows.iter().find(|w| w.tag() == tag)
    }

    pub fn windows(&self) -> &[HolidayWindow] {
        &self.windows
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Tags each record with its holiday week, preserving input order.
pub fn assign(records: &[DailyRecord], index: &WindowIndex) -> Vec<AssignedRecord> {
    records
        .iter()
        .map(|record| AssignedRecord {
            record: *record,
            tag: index.lookup(record.date),
        })
        .collect()
}
