//! Classifier configuration

use crate::DmsError;
use serde::{Deserialize, Serialize};

/// Trigger for one alertness state: either metric strictly above its bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// PERCLOS bound (percent)
    pub perclos: f64,

    /// Yawn count bound (per interval)
    pub yawns: u32,
}

impl Threshold {
    pub const fn new(perclos: f64, yawns: u32) -> Self {
        Self { perclos, yawns }
    }

    /// Strict comparison: a value equal to the bound does not trigger
    pub fn is_exceeded(&self, perclos: f64, yawns: u32) -> bool {
        perclos > self.perclos || yawns > self.yawns
    }
}

/// Classifier thresholds, checked from most to least severe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub microsleep: Threshold,
    pub fatigue: Threshold,
    pub drowsiness: Threshold,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            microsleep: Threshold::new(80.0, 7),
            fatigue: Threshold::new(60.0, 5),
            drowsiness: Threshold::new(40.0, 3),
        }
    }
}

impl ClassifierConfig {
    /// Reject PERCLOS bounds outside the metric's 0-100 domain
    pub fn validate(&self) -> Result<(), DmsError> {
        for (name, threshold) in [
            ("microsleep", &self.microsleep),
            ("fatigue", &self.fatigue),
            ("drowsiness", &self.drowsiness),
        ] {
            if !threshold.perclos.is_finite() || !(0.0..=100.0).contains(&threshold.perclos) {
                return Err(DmsError::Config(format!(
                    "{name} PERCLOS threshold {} is outside [0, 100]",
                    threshold.perclos
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = ClassifierConfig::default();
        assert_eq!(config.microsleep, Threshold::new(80.0, 7));
        assert_eq!(config.fatigue, Threshold::new(60.0, 5));
        assert_eq!(config.drowsiness, Threshold::new(40.0, 3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_is_strict() {
        let threshold = Threshold::new(80.0, 7);
        assert!(!threshold.is_exceeded(80.0, 7));
        assert!(threshold.is_exceeded(80.01, 0));
        assert!(threshold.is_exceeded(0.0, 8));
    }

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let config = ClassifierConfig {
            fatigue: Threshold::new(120.0, 5),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DmsError::Config(_))));

        let config = ClassifierConfig {
            drowsiness: Threshold::new(f64::NAN, 3),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{"fatigue": {"perclos": 55.0, "yawns": 4}}"#).unwrap();
        assert_eq!(config.fatigue, Threshold::new(55.0, 4));
        assert_eq!(config.microsleep, Threshold::new(80.0, 7));
    }
}
