//! Historical Query Routes

use axum::{extract::State, http::StatusCode, Json};
use history_query::{
    FetchOutcome, HistoryRequest, HistoryResult, HistoryView, RawDateRange, SummaryStatistics,
};
use rolling_history::{DualHistoryPoint, HistoryPoint, RollingHistory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

/// Form submission; absent fields arrive as empty strings
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl From<HistoryQuery> for RawDateRange {
    fn from(query: HistoryQuery) -> Self {
        RawDateRange::new(query.start, query.end)
    }
}

/// Outcome of a submitted query
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryQueryResponse {
    Populated {
        range: HistoryRequest,
        stats: SummaryStatistics,
        perclos: RollingHistory<HistoryPoint>,
        blinks_yawns: RollingHistory<DualHistoryPoint>,
    },
    NoData,
    Superseded,
}

impl From<FetchOutcome> for HistoryQueryResponse {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Populated(HistoryResult {
                range,
                stats,
                series,
            }) => HistoryQueryResponse::Populated {
                range,
                stats,
                perclos: series.perclos,
                blinks_yawns: series.blinks_yawns,
            },
            FetchOutcome::NoData => HistoryQueryResponse::NoData,
            FetchOutcome::Superseded => HistoryQueryResponse::Superseded,
        }
    }
}

/// Validate, normalize and run a range query
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(query): Json<HistoryQuery>,
) -> Result<Json<HistoryQueryResponse>, AppError> {
    let outcome = state.history.fetch_history(&query.into()).await?;
    Ok(Json(outcome.into()))
}

/// What the historical panel currently shows
pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<HistoryView> {
    Json(state.history.view())
}

/// Clear the historical panel and orphan any in-flight query
pub async fn reset(State(state): State<Arc<AppState>>) -> StatusCode {
    state.history.reset();
    StatusCode::NO_CONTENT
}

/// Range the query form starts with
pub async fn default_range() -> Json<RawDateRange> {
    Json(RawDateRange::default())
}
