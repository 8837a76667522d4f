//! Historical Query Pipeline
//!
//! validate → normalize → retrieve → (no data | project + commit)

use crate::error::HistoryError;
use crate::normalize::{utc_label, TimezonePolicy};
use crate::observer::HistoryObserver;
use crate::range::RawDateRange;
use crate::service::{HistoryConfig, HistoryService, HttpHistoryService};
use crate::stats::SummaryStatistics;
use crate::wire::{HistoryRequest, HistoryResponse};
use rolling_history::ChartSeries;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Chart series and statistics produced by one successful query
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResult {
    /// Normalized range that was queried
    pub range: HistoryRequest,
    pub stats: SummaryStatistics,
    pub series: ChartSeries,
}

/// Terminal outcome of a fetch that did not fail
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Records found; the result was committed
    Populated(HistoryResult),
    /// The range held no records
    NoData,
    /// A reset happened while the request was in flight; the response was dropped
    Superseded,
}

/// What the historical view should currently render
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryView {
    pub loading: bool,
    /// Show the "no records in range" indicator instead of charts
    pub no_data: bool,
    /// Last committed result
    pub result: Option<HistoryResult>,
    /// Message from the last failed retrieval
    pub last_error: Option<String>,
}

#[derive(Default)]
struct PipelineState {
    view: HistoryView,
    /// Bumped per fetch and per reset; only the current generation may commit
    generation: u64,
}

/// Clears the loading flag if a fetch is dropped before it completes
struct LoadingGuard<'a> {
    pipeline: &'a HistoryPipeline,
    generation: u64,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.pipeline.lock_state();
        if state.generation == self.generation {
            state.view.loading = false;
            drop(state);
            debug!("Historical query {} abandoned", self.generation);
            self.pipeline.notify(|o| o.on_loading(false));
        }
    }
}

/// Turns an operator date range into chart series and summary statistics.
///
/// A fetch is refused while another is loading. Every successful query
/// replaces the previous result wholesale; failures leave it untouched.
pub struct HistoryPipeline {
    service: Arc<dyn HistoryService>,
    policy: TimezonePolicy,
    state: Mutex<PipelineState>,
    observers: Mutex<Vec<Arc<dyn HistoryObserver>>>,
}

impl HistoryPipeline {
    pub fn new(service: Arc<dyn HistoryService>, policy: TimezonePolicy) -> Result<Self, HistoryError> {
        policy.validate()?;
        info!("Historical query pipeline created ({:?})", policy);
        Ok(Self {
            service,
            policy,
            state: Mutex::new(PipelineState::default()),
            observers: Mutex::new(Vec::new()),
        })
    }

    /// Pipeline over the HTTP service described by `config`
    pub fn from_config(config: &HistoryConfig) -> Result<Self, HistoryError> {
        let service = HttpHistoryService::new(config)?;
        info!("Historical service endpoint: {}", service.endpoint());
        Self::new(Arc::new(service), config.timezone)
    }

    pub fn subscribe(&self, observer: Arc<dyn HistoryObserver>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn policy(&self) -> TimezonePolicy {
        self.policy
    }

    /// Run a range query end to end.
    ///
    /// Input errors return before any state changes. Retrieval errors
    /// clear the loading flag and keep the previously committed result.
    pub async fn fetch_history(&self, raw: &RawDateRange) -> Result<FetchOutcome, HistoryError> {
        let range = raw.validate()?;
        let request = range.to_request(self.policy)?;

        let generation = {
            let mut state = self.lock_state();
            if state.view.loading {
                warn!("Historical query rejected: another query is loading");
                return Err(HistoryError::Busy);
            }
            state.view.loading = true;
            state.generation += 1;
            state.generation
        };
        let mut guard = LoadingGuard {
            pipeline: self,
            generation,
            armed: true,
        };
        self.notify(|o| o.on_loading(true));

        info!(
            "Historical query {}: {} -> {}",
            generation, request.start, request.end
        );
        let response = self.service.query(&request).await;
        guard.armed = false;

        let mut state = self.lock_state();
        if state.generation != generation {
            warn!("Discarding stale response for historical query {}", generation);
            metrics::counter!("history_queries_total", "outcome" => "superseded").increment(1);
            return Ok(FetchOutcome::Superseded);
        }
        state.view.loading = false;

        match response.and_then(|response| project(request, response)) {
            Err(err) => {
                warn!("Historical query {} failed: {}", generation, err);
                state.view.no_data = false;
                state.view.last_error = Some(err.to_string());
                drop(state);
                metrics::counter!("history_queries_total", "outcome" => "error").increment(1);
                self.notify(|o| {
                    o.on_loading(false);
                    o.on_error(&err);
                });
                Err(err)
            }
            Ok(None) => {
                info!("Historical query {}: no records in range", generation);
                state.view.no_data = true;
                state.view.last_error = None;
                drop(state);
                metrics::counter!("history_queries_total", "outcome" => "no_data").increment(1);
                self.notify(|o| {
                    o.on_loading(false);
                    o.on_no_data();
                });
                Ok(FetchOutcome::NoData)
            }
            Ok(Some(result)) => {
                info!(
                    "Historical query {}: {} records",
                    generation, result.stats.total_records
                );
                state.view.no_data = false;
                state.view.last_error = None;
                state.view.result = Some(result.clone());
                drop(state);
                metrics::counter!("history_queries_total", "outcome" => "populated").increment(1);
                self.notify(|o| {
                    o.on_loading(false);
                    o.on_populated(&result);
                });
                Ok(FetchOutcome::Populated(result))
            }
        }
    }

    /// Drop the displayed result and orphan any in-flight query
    pub fn reset(&self) {
        let was_loading = {
            let mut state = self.lock_state();
            state.generation += 1;
            std::mem::take(&mut state.view).loading
        };
        info!("Historical view reset");
        if was_loading {
            self.notify(|o| o.on_loading(false));
        }
    }

    pub fn view(&self) -> HistoryView {
        self.lock_state().view.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().view.loading
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: impl Fn(&dyn HistoryObserver)) {
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            event(observer.as_ref());
        }
    }
}

/// Build chart series from the raw records and copy the service aggregates.
///
/// Returns `None` for an empty record list.
fn project(
    range: HistoryRequest,
    response: HistoryResponse,
) -> Result<Option<HistoryResult>, HistoryError> {
    if response.alerts.is_empty() {
        return Ok(None);
    }

    let stats = response
        .alert_stats
        .as_ref()
        .map(SummaryStatistics::from)
        .ok_or_else(|| HistoryError::Parse("response has alerts but no alert_stats".to_string()))?;

    let mut series = ChartSeries::unbounded();
    for record in &response.alerts {
        series.push(utc_label(&record.time)?, record.perclos, record.blinks, record.yawns);
    }

    Ok(Some(HistoryResult {
        range,
        stats,
        series,
    }))
}
