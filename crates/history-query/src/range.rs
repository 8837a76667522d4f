//! Operator date range validation

use crate::error::HistoryError;
use crate::normalize::TimezonePolicy;
use crate::wire::HistoryRequest;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Forms a `datetime-local` field submits
const INPUT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Range exactly as typed into the two form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDateRange {
    pub start: String,
    pub end: String,
}

impl Default for RawDateRange {
    /// The form's pre-filled range
    fn default() -> Self {
        Self::new("2025-10-01T08:00", "2025-11-01T18:00")
    }
}

impl RawDateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Check presence, then format, then ordering
    pub fn validate(&self) -> Result<DateRange, HistoryError> {
        let start = self.start.trim();
        let end = self.end.trim();

        if start.is_empty() {
            return Err(HistoryError::MissingField("start"));
        }
        if end.is_empty() {
            return Err(HistoryError::MissingField("end"));
        }

        DateRange::new(parse_local("start", start)?, parse_local("end", end)?)
    }
}

/// Validated range of operator wall-clock times; `start < end` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, HistoryError> {
        if start >= end {
            return Err(HistoryError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Qualify both endpoints with a timezone for the service request
    pub fn to_request(&self, policy: TimezonePolicy) -> Result<HistoryRequest, HistoryError> {
        Ok(HistoryRequest {
            start: policy.normalize(self.start)?,
            end: policy.normalize(self.end)?,
        })
    }
}

fn parse_local(field: &'static str, value: &str) -> Result<NaiveDateTime, HistoryError> {
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| HistoryError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_valid() {
        let range = RawDateRange::default().validate().unwrap();
        assert_eq!(range.start().to_string(), "2025-10-01 08:00:00");
        assert_eq!(range.end().to_string(), "2025-11-01 18:00:00");
    }

    #[test]
    fn test_seconds_accepted() {
        let range = RawDateRange::new("2025-11-02T14:30:15", "2025-11-02T15:00")
            .validate()
            .unwrap();
        assert_eq!(range.start().to_string(), "2025-11-02 14:30:15");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            RawDateRange::new("", "2025-11-02T14:30").validate(),
            Err(HistoryError::MissingField("start"))
        );
        assert_eq!(
            RawDateRange::new("2025-11-02T14:30", "   ").validate(),
            Err(HistoryError::MissingField("end"))
        );
    }

    #[test]
    fn test_presence_checked_before_format() {
        assert_eq!(
            RawDateRange::new("garbage", "").validate(),
            Err(HistoryError::MissingField("end"))
        );
    }

    #[test]
    fn test_invalid_format() {
        let err = RawDateRange::new("02/11/2025 14:30", "2025-11-02T15:00")
            .validate()
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidTimestamp { field: "start", .. }));

        let err = RawDateRange::new("2025-11-02T14:30", "2025-13-02T15:00")
            .validate()
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidTimestamp { field: "end", .. }));
    }

    #[test]
    fn test_equal_endpoints_rejected() {
        let err = RawDateRange::new("2025-11-02T14:30", "2025-11-02T14:30")
            .validate()
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvertedRange { .. }));
    }

    #[test]
    fn test_reversed_endpoints_rejected() {
        let err = RawDateRange::new("2025-11-02T15:00", "2025-11-02T14:30")
            .validate()
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvertedRange { .. }));
    }
}
