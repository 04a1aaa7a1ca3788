//! Holiday-week assignment and aggregation.
//!
//! This module tags each daily record with the holiday week it falls in,
//! averages each week over the days present, and derives the heatmap,
//! line-chart and calendar-week views handed to the renderer.

pub mod aggregate;
pub mod analyzer;
pub mod assign;
pub mod calendar_week;
pub mod types;
pub mod views;
