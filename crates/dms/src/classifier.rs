//! Alertness classification

use crate::config::ClassifierConfig;
use crate::sample::MetricSample;
use crate::state::AlertnessState;
use crate::DmsError;
use tracing::debug;

/// Threshold classifier mapping a metric sample to an alertness state.
///
/// States are checked in severity order and the first match wins, so a
/// sample that trips several thresholds always gets the most severe state.
/// Blink count is observational and never affects the result.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with validated thresholds
    pub fn new(config: ClassifierConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, sample: &MetricSample) -> AlertnessState {
        let (perclos, yawns) = (sample.perclos, sample.yawn_count);

        let state = if self.config.microsleep.is_exceeded(perclos, yawns) {
            AlertnessState::Microsleep
        } else if self.config.fatigue.is_exceeded(perclos, yawns) {
            AlertnessState::Fatigue
        } else if self.config.drowsiness.is_exceeded(perclos, yawns) {
            AlertnessState::Drowsiness
        } else {
            AlertnessState::Normal
        };

        debug!("Classified perclos={:.1} yawns={} as {}", perclos, yawns, state);
        state
    }
}

/// Classify with the default threshold table
pub fn classify(sample: &MetricSample) -> AlertnessState {
    Classifier::default().classify(sample)
}
