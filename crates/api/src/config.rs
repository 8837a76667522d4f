//! Dashboard configuration
//!
//! Layered as serde defaults, then an optional TOML file, then
//! `SAFEDRIVE__SECTION__KEY` environment variables.

use crate::rate_limit::RateLimitConfig;
use config::{Config, Environment, File};
use dms::ClassifierConfig;
use history_query::HistoryConfig;
use live_sampler::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; `RUST_LOG` takes precedence when set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub sampler: SamplerConfig,
    pub classifier: ClassifierConfig,
    pub history: HistoryConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ApiError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: DashboardConfig = builder
            .add_source(
                Environment::with_prefix("SAFEDRIVE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        self.classifier.validate()?;
        self.history.timezone.validate()?;
        if self.sampler.window == 0 {
            return Err(ApiError::Config("sampler.window must be at least 1".into()));
        }
        if self.sampler.interval_ms == 0 {
            return Err(ApiError::Config("sampler.interval_ms must be positive".into()));
        }
        if self.rate_limit.enabled && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0) {
            return Err(ApiError::Config(
                "rate_limit.per_second and burst_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use history_query::TimezonePolicy;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.sampler.interval_ms, 2000);
        assert_eq!(config.sampler.window, 20);
        assert_eq!(config.classifier.fatigue.perclos, 60.0);
        assert_eq!(config.history.request_timeout_ms, None);
        assert_eq!(
            config.history.timezone,
            TimezonePolicy::FixedOffset { offset_minutes: -300 }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[sampler]
interval_ms = 500

[classifier.microsleep]
perclos = 85.0
yawns = 8

[history]
endpoint = "http://history.local/alerts/history"
request_timeout_ms = 3000

[history.timezone]
mode = "utc"
"#
        )
        .unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.sampler.interval_ms, 500);
        assert_eq!(config.sampler.window, 20);
        assert_eq!(config.classifier.microsleep.perclos, 85.0);
        assert_eq!(config.classifier.microsleep.yawns, 8);
        assert_eq!(config.classifier.drowsiness.perclos, 40.0);
        assert_eq!(config.history.endpoint, "http://history.local/alerts/history");
        assert_eq!(config.history.request_timeout_ms, Some(3000));
        assert_eq!(config.history.timezone, TimezonePolicy::Utc);
    }

    #[test]
    fn test_rejects_invalid_thresholds() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[classifier.fatigue]\nperclos = 140.0\nyawns = 5").unwrap();

        let err = DashboardConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ApiError::Classifier(_)));
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = DashboardConfig::default();
        config.sampler.window = 0;
        assert!(matches!(config.validate(), Err(ApiError::Config(_))));
    }
}
