//! Chart series shared by the live and historical views

use crate::buffer::{Capacity, RollingHistory};
use serde::{Deserialize, Serialize};

/// Eyelid-closure chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub time: String,
    pub value: f64,
}

/// Blink/yawn chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualHistoryPoint {
    pub time: String,
    pub blinks: f64,
    pub yawns: f64,
}

/// The pair of series behind the two dashboard charts.
///
/// Both histories always receive the same appends, so they have equal
/// length and share time labels index by index.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub perclos: RollingHistory<HistoryPoint>,
    pub blinks_yawns: RollingHistory<DualHistoryPoint>,
}

impl ChartSeries {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            perclos: RollingHistory::new(capacity),
            blinks_yawns: RollingHistory::new(capacity),
        }
    }

    /// Series sized for the live charts
    pub fn live() -> Self {
        Self {
            perclos: RollingHistory::live(),
            blinks_yawns: RollingHistory::live(),
        }
    }

    /// Series for a historical query (one point per record)
    pub fn unbounded() -> Self {
        Self::new(Capacity::Unbounded)
    }

    /// Append one observation to both series under the same label
    pub fn push(&mut self, time: impl Into<String>, perclos: f64, blinks: f64, yawns: f64) {
        let time = time.into();
        self.perclos.push(HistoryPoint {
            time: time.clone(),
            value: perclos,
        });
        self.blinks_yawns.push(DualHistoryPoint {
            time,
            blinks,
            yawns,
        });
    }

    pub fn clear(&mut self) {
        self.perclos.clear();
        self.blinks_yawns.clear();
    }

    pub fn len(&self) -> usize {
        self.perclos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perclos.is_empty()
    }
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self::unbounded()
    }
}
