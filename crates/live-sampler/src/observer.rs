//! Subscription hooks for UI layers

use crate::sampler::LiveReading;
use rolling_history::ChartSeries;

/// Receives live sampler events.
///
/// Callbacks run in tick order while the sampler state is locked, so an
/// observer must not call back into the sampler.
pub trait SamplerObserver: Send + Sync {
    /// A new reading was classified and appended to `series`
    fn on_reading(&self, reading: &LiveReading, series: &ChartSeries);

    fn on_started(&self) {}

    /// Sampling stopped and both windows were cleared
    fn on_stopped(&self) {}
}
