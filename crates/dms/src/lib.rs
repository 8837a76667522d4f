//! Driver Monitoring System (DMS)
//!
//! Alertness classification for the fatigue dashboard:
//! - Per-interval metric samples (PERCLOS, blinks, yawns)
//! - Severity-ordered threshold classifier
//! - Alertness states with their display and wire names

pub mod classifier;
pub mod config;
pub mod sample;
pub mod state;

pub use classifier::{classify, Classifier};
pub use config::{ClassifierConfig, Threshold};
pub use sample::MetricSample;
pub use state::AlertnessState;

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown alertness state: {0}")]
    UnknownState(String),
}
