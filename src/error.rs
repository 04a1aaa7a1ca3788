//! Error types for holiday resolution, window indexing and data loading.
//!
//! Configuration-level failures are [`HolidayError`] and abort a run.
//! Record-level problems are [`RecordWarning`] values that are collected
//! during ingest and reported in the run summary instead.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::holidays::WindowTag;

/// Fatal errors raised while resolving holidays or processing a run.
#[derive(Debug, Error)]
pub enum HolidayError {
    #[error("unknown holiday '{0}'")]
    UnknownHoliday(String),

    #[error("holiday windows overlap on {date}: {first} and {second} both claim it")]
    OverlappingWindow {
        date: NaiveDate,
        first: WindowTag,
        second: WindowTag,
    },

    #[error("invalid rule for {holiday}: {reason}")]
    InvalidRule { holiday: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HolidayError {
    pub(crate) fn invalid_rule(holiday: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            holiday: holiday.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HolidayError>;

/// A non-fatal problem with a single input row.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordWarning {
    /// The row was dropped.
    #[error("line {line}: malformed record dropped: {reason}")]
    Malformed { line: usize, reason: String },

    /// An earlier row for the same date was replaced by this one.
    #[error("line {line}: duplicate record for {date}, keeping the later row")]
    DuplicateDate { date: NaiveDate, line: usize },
}
