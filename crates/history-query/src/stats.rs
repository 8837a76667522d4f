//! Summary statistics for a historical range

use crate::wire::{AlertStats, StatePercentages};
use dms::AlertnessState;
use serde::{Deserialize, Serialize};

/// Share of elapsed time spent in each alertness state (percent).
///
/// Values come straight from the service and need not sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDistribution {
    pub normal: f64,
    pub fatigue: f64,
    pub drowsiness: f64,
    pub microsleep: f64,
}

impl StateDistribution {
    pub fn get(&self, state: AlertnessState) -> f64 {
        match state {
            AlertnessState::Normal => self.normal,
            AlertnessState::Fatigue => self.fatigue,
            AlertnessState::Drowsiness => self.drowsiness,
            AlertnessState::Microsleep => self.microsleep,
        }
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (AlertnessState, f64)> + '_ {
        AlertnessState::ALL
            .into_iter()
            .map(move |state| (state, self.get(state)))
    }

    /// State with the largest share (first in display order on ties)
    pub fn dominant(&self) -> AlertnessState {
        self.iter()
            .fold((AlertnessState::Normal, f64::MIN), |best, entry| {
                if entry.1 > best.1 {
                    entry
                } else {
                    best
                }
            })
            .0
    }
}

impl From<&StatePercentages> for StateDistribution {
    fn from(percent: &StatePercentages) -> Self {
        Self {
            normal: percent.normal,
            fatigue: percent.fatigue,
            drowsiness: percent.drowsiness,
            microsleep: percent.microsleep,
        }
    }
}

/// Totals and averages for one query, copied from the service aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_records: u64,
    pub average_perclos: f64,
    pub total_blinks: f64,
    pub total_yawns: f64,
    pub state_distribution: StateDistribution,
}

impl From<&AlertStats> for SummaryStatistics {
    fn from(stats: &AlertStats) -> Self {
        Self {
            total_records: stats.total_records,
            average_perclos: stats.avg_perclos,
            total_blinks: stats.total_blinks,
            total_yawns: stats.total_yawns,
            state_distribution: StateDistribution::from(&stats.estado_percent),
        }
    }
}
