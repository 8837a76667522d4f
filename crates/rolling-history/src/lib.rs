//! Rolling History
//!
//! Append-only chart history used by both dashboard pipelines:
//! - a bounded, discard-oldest window feeding the live charts
//! - an unbounded sequence holding one point per historical record

mod buffer;
mod series;

pub use buffer::{Capacity, RollingHistory, LIVE_WINDOW};
pub use series::{ChartSeries, DualHistoryPoint, HistoryPoint};
