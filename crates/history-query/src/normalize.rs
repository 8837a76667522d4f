//! Timezone normalization of operator input and service timestamps

use crate::error::HistoryError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// UTC-05:00, the offset the operator form is interpreted in by default
pub const DEFAULT_OFFSET_MINUTES: i32 = -300;

/// Format of the time labels on historical charts
const UTC_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset-less forms accepted from the service and read as UTC
const NAIVE_SERVICE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// How an operator wall-clock time becomes an absolute instant.
///
/// One policy applies to a whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// Input is wall-clock time at a fixed offset and is sent with that offset
    FixedOffset { offset_minutes: i32 },
    /// Input is already UTC and is sent with a `Z` marker
    Utc,
}

impl Default for TimezonePolicy {
    fn default() -> Self {
        TimezonePolicy::FixedOffset {
            offset_minutes: DEFAULT_OFFSET_MINUTES,
        }
    }
}

impl TimezonePolicy {
    /// Fail early on offsets chrono cannot represent (beyond ±24h)
    pub fn validate(&self) -> Result<(), HistoryError> {
        match self {
            TimezonePolicy::FixedOffset { offset_minutes } => fixed_offset(*offset_minutes).map(|_| ()),
            TimezonePolicy::Utc => Ok(()),
        }
    }

    /// RFC 3339 instant with millisecond precision
    ///
    /// `2025-11-02T14:30` becomes `2025-11-02T14:30:00.000-05:00` under the
    /// default offset, or `2025-11-02T14:30:00.000Z` under `Utc`.
    pub fn normalize(&self, local: NaiveDateTime) -> Result<String, HistoryError> {
        match self {
            TimezonePolicy::FixedOffset { offset_minutes } => {
                let offset = fixed_offset(*offset_minutes)?;
                let instant = offset.from_local_datetime(&local).single().ok_or_else(|| {
                    HistoryError::Config(format!("{local} has no instant at offset {offset}"))
                })?;
                Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, false))
            }
            TimezonePolicy::Utc => Ok(Utc
                .from_utc_datetime(&local)
                .to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

fn fixed_offset(minutes: i32) -> Result<FixedOffset, HistoryError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| HistoryError::Config(format!("invalid UTC offset of {minutes} minutes")))
}

/// Parse a service timestamp; values without an offset are taken as UTC
pub fn parse_service_instant(value: &str) -> Result<DateTime<Utc>, HistoryError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    NAIVE_SERVICE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| HistoryError::Parse(format!("invalid alert time '{value}'")))
}

/// Historical chart label, always rendered in UTC so every viewer sees the same text
pub fn utc_label(value: &str) -> Result<String, HistoryError> {
    Ok(parse_service_instant(value)?
        .format(UTC_LABEL_FORMAT)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn test_default_fixed_offset() {
        let iso = TimezonePolicy::default()
            .normalize(local("2025-11-02T14:30"))
            .unwrap();
        assert_eq!(iso, "2025-11-02T14:30:00.000-05:00");

        // Same instant as 19:30 UTC
        let instant = DateTime::parse_from_rfc3339(&iso).unwrap().with_timezone(&Utc);
        assert_eq!(instant.to_rfc3339_opts(SecondsFormat::Secs, true), "2025-11-02T19:30:00Z");
    }

    #[test]
    fn test_utc_policy() {
        let iso = TimezonePolicy::Utc
            .normalize(local("2025-11-02T14:30"))
            .unwrap();
        assert_eq!(iso, "2025-11-02T14:30:00.000Z");
    }

    #[test]
    fn test_positive_offset() {
        let policy = TimezonePolicy::FixedOffset { offset_minutes: 330 };
        let iso = policy.normalize(local("2025-01-01T00:00")).unwrap();
        assert_eq!(iso, "2025-01-01T00:00:00.000+05:30");
    }

    #[test]
    fn test_invalid_offset() {
        let policy = TimezonePolicy::FixedOffset { offset_minutes: 24 * 60 };
        assert!(matches!(policy.validate(), Err(HistoryError::Config(_))));
        assert!(TimezonePolicy::default().validate().is_ok());
    }

    #[test]
    fn test_policy_serde() {
        let policy: TimezonePolicy = serde_json::from_str(r#"{"mode": "utc"}"#).unwrap();
        assert_eq!(policy, TimezonePolicy::Utc);

        let policy: TimezonePolicy =
            serde_json::from_str(r#"{"mode": "fixed_offset", "offset_minutes": -300}"#).unwrap();
        assert_eq!(policy, TimezonePolicy::default());
    }

    #[test]
    fn test_utc_label_converts_offsets() {
        assert_eq!(
            utc_label("2025-11-02T14:30:05-05:00").unwrap(),
            "2025-11-02 19:30:05"
        );
        assert_eq!(
            utc_label("2025-11-02T19:30:05.250Z").unwrap(),
            "2025-11-02 19:30:05"
        );
    }

    #[test]
    fn test_utc_label_naive_is_utc() {
        assert_eq!(utc_label("2025-11-02T19:30:05").unwrap(), "2025-11-02 19:30:05");
        assert_eq!(utc_label("2025-11-02 19:30:05.5").unwrap(), "2025-11-02 19:30:05");
    }

    #[test]
    fn test_utc_label_rejects_garbage() {
        assert!(matches!(utc_label("yesterday"), Err(HistoryError::Parse(_))));
    }
}
