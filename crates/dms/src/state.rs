//! Driver alertness states

use crate::DmsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alertness state derived from a metric sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertnessState {
    #[default]
    Normal,
    Fatigue,
    Drowsiness,
    Microsleep,
}

impl AlertnessState {
    /// States in the order the distribution panel lists them
    pub const ALL: [AlertnessState; 4] = [
        AlertnessState::Normal,
        AlertnessState::Fatigue,
        AlertnessState::Drowsiness,
        AlertnessState::Microsleep,
    ];

    /// Severity rank, 0 for `Normal` up to 3 for `Microsleep`
    pub fn severity(self) -> u8 {
        match self {
            AlertnessState::Normal => 0,
            AlertnessState::Drowsiness => 1,
            AlertnessState::Fatigue => 2,
            AlertnessState::Microsleep => 3,
        }
    }

    /// Label shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            AlertnessState::Normal => "Normal",
            AlertnessState::Fatigue => "Fatiga",
            AlertnessState::Drowsiness => "Somnolencia",
            AlertnessState::Microsleep => "Microsueño",
        }
    }

    /// Key used by the historical service in `estado_percent`
    pub fn wire_key(self) -> &'static str {
        match self {
            AlertnessState::Normal => "NORMAL",
            AlertnessState::Fatigue => "FATIGA",
            AlertnessState::Drowsiness => "SOMNOLENCIA",
            AlertnessState::Microsleep => "MICROSUEÑO",
        }
    }

    /// Whether the state should raise a driver alert
    pub fn is_alert(self) -> bool {
        self != AlertnessState::Normal
    }
}

impl fmt::Display for AlertnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertnessState::Normal => "normal",
            AlertnessState::Fatigue => "fatigue",
            AlertnessState::Drowsiness => "drowsiness",
            AlertnessState::Microsleep => "microsleep",
        };
        f.write_str(name)
    }
}

impl FromStr for AlertnessState {
    type Err = DmsError;

    /// Accepts the lowercase name or the service wire key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertnessState::ALL
            .into_iter()
            .find(|state| state.to_string() == s || state.wire_key() == s)
            .ok_or_else(|| DmsError::UnknownState(s.to_string()))
    }
}
