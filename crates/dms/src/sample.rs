//! Metric samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation interval of driver metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Eyelid-closure percentage over the interval (0-100)
    pub perclos: f64,

    /// Blinks counted over the interval
    pub blink_count: u32,

    /// Yawns counted over the interval
    pub yawn_count: u32,

    /// When the interval was sampled
    pub timestamp: DateTime<Utc>,
}

impl MetricSample {
    pub fn new(perclos: f64, blink_count: u32, yawn_count: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            perclos,
            blink_count,
            yawn_count,
            timestamp,
        }
    }

    /// Sample stamped with the current time
    pub fn now(perclos: f64, blink_count: u32, yawn_count: u32) -> Self {
        Self::new(perclos, blink_count, yawn_count, Utc::now())
    }

    /// PERCLOS as shown on the metric card ("42.5%")
    pub fn perclos_display(&self) -> String {
        format!("{:.1}%", self.perclos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perclos_display_rounds_to_one_decimal() {
        let sample = MetricSample::now(42.46, 10, 1);
        assert_eq!(sample.perclos_display(), "42.5%");

        let sample = MetricSample::now(0.0, 0, 0);
        assert_eq!(sample.perclos_display(), "0.0%");
    }
}
