//! Live Monitoring Routes

use axum::{extract::State, Json};
use live_sampler::LiveSnapshot;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Response for the start/stop controls
#[derive(Debug, Serialize)]
pub struct LiveControlResponse {
    /// Sampler running after the call
    pub running: bool,
    /// Whether the call changed the sampler phase
    pub changed: bool,
}

/// Current reading plus both chart windows
pub async fn get_live(State(state): State<Arc<AppState>>) -> Json<LiveSnapshot> {
    Json(state.sampler.snapshot())
}

/// Start live sampling; idempotent
pub async fn start(State(state): State<Arc<AppState>>) -> Json<LiveControlResponse> {
    let changed = state.sampler.start();
    Json(LiveControlResponse {
        running: state.sampler.is_running(),
        changed,
    })
}

/// Stop live sampling and clear the charts; idempotent
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<LiveControlResponse> {
    let changed = state.sampler.stop();
    Json(LiveControlResponse {
        running: state.sampler.is_running(),
        changed,
    })
}
