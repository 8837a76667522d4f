//! Subscription hooks for UI layers

use crate::error::HistoryError;
use crate::pipeline::HistoryResult;

/// Receives historical query lifecycle events. All methods default to no-ops.
pub trait HistoryObserver: Send + Sync {
    /// Loading indicator changed
    fn on_loading(&self, _loading: bool) {}

    /// A new result replaced the previous one
    fn on_populated(&self, _result: &HistoryResult) {}

    /// The range held no records
    fn on_no_data(&self) {}

    /// Retrieval failed; displayed data is unchanged
    fn on_error(&self, _error: &HistoryError) {}
}
