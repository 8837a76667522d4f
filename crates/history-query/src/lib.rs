//! Historical Alert Queries
//!
//! Operator-driven range queries against the historical alert service:
//! - Date range validation and timezone normalization
//! - HTTP retrieval of alert records and precomputed aggregates
//! - Projection into chart series and summary statistics
//! - Re-entrancy gate and stale-response discarding

mod error;
mod normalize;
mod observer;
mod pipeline;
mod range;
mod service;
mod stats;
mod wire;

pub use error::{ErrorKind, HistoryError};
pub use normalize::{parse_service_instant, utc_label, TimezonePolicy, DEFAULT_OFFSET_MINUTES};
pub use observer::HistoryObserver;
pub use pipeline::{FetchOutcome, HistoryPipeline, HistoryResult, HistoryView};
pub use range::{DateRange, RawDateRange};
pub use service::{HistoryConfig, HistoryService, HttpHistoryService};
pub use stats::{StateDistribution, SummaryStatistics};
pub use wire::{AlertRecord, AlertStats, HistoryRequest, HistoryResponse, StatePercentages};
