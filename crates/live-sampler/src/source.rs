//! Metric sample producers

use chrono::{DateTime, Utc};
use dms::MetricSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces the metrics for one sampling interval.
///
/// This is the only step a real sensor feed replaces.
pub trait SampleSource: Send {
    fn next_sample(&mut self, timestamp: DateTime<Utc>) -> MetricSample;
}

/// Simulated feed: PERCLOS in [0, 100), blinks in [0, 30), yawns in [0, 10)
#[derive(Debug, Clone)]
pub struct RandomSampleSource {
    rng: StdRng,
}

impl RandomSampleSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSampleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for RandomSampleSource {
    fn next_sample(&mut self, timestamp: DateTime<Utc>) -> MetricSample {
        MetricSample::new(
            self.rng.gen_range(0.0..100.0),
            self.rng.gen_range(0..30),
            self.rng.gen_range(0..10),
            timestamp,
        )
    }
}

impl<F> SampleSource for F
where
    F: FnMut(DateTime<Utc>) -> MetricSample + Send,
{
    fn next_sample(&mut self, timestamp: DateTime<Utc>) -> MetricSample {
        self(timestamp)
    }
}
