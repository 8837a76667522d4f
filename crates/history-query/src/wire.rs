//! Historical service request/response bodies

use crate::error::HistoryError;
use crate::normalize::parse_service_instant;
use dms::MetricSample;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// `POST` body sent to the historical service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Timezone-qualified ISO-8601 instant
    pub start: String,
    /// Timezone-qualified ISO-8601 instant
    pub end: String,
}

/// One detected alert event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// ISO-8601 instant of the event
    pub time: String,
    pub perclos: f64,
    pub blinks: f64,
    pub yawns: f64,
}

impl AlertRecord {
    /// The record as a metric sample; counts are rounded and clamped at zero
    pub fn to_sample(&self) -> Result<MetricSample, HistoryError> {
        let timestamp = parse_service_instant(&self.time)?;
        Ok(MetricSample::new(
            self.perclos,
            count(self.blinks),
            count(self.yawns),
            timestamp,
        ))
    }
}

fn count(value: f64) -> u32 {
    // `as` saturates; NaN becomes 0
    value.round().max(0.0) as u32
}

/// Percentage of elapsed time per alertness state, keyed as the service sends it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatePercentages {
    #[serde(rename = "NORMAL", default, deserialize_with = "null_as_default")]
    pub normal: f64,
    #[serde(rename = "FATIGA", default, deserialize_with = "null_as_default")]
    pub fatigue: f64,
    #[serde(rename = "SOMNOLENCIA", default, deserialize_with = "null_as_default")]
    pub drowsiness: f64,
    #[serde(rename = "MICROSUEÑO", default, deserialize_with = "null_as_default")]
    pub microsleep: f64,
}

/// Aggregates precomputed by the service over the queried range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_perclos: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_blinks: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_yawns: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estado_percent: StatePercentages,
    #[serde(default, deserialize_with = "record_count")]
    pub total_records: u64,
}

/// Service answer for a range query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub alert_stats: Option<AlertStats>,
}

// Aggregates over an empty range come back as null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Counts may arrive as integral floats (`47.0`).
fn record_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as u64)
    } else {
        Err(D::Error::custom(format!("invalid record count {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "alerts": [
                {"time": "2025-10-05T10:15:00Z", "perclos": 72.5, "blinks": 14, "yawns": 6}
            ],
            "alert_stats": {
                "avg_perclos": 32.5,
                "total_blinks": 183,
                "total_yawns": 21,
                "estado_percent": {"NORMAL": 68.2, "FATIGA": 18.5, "SOMNOLENCIA": 10.1, "MICROSUEÑO": 3.2},
                "total_records": 47
            }
        }"#;

        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.alerts.len(), 1);
        assert_eq!(response.alerts[0].blinks, 14.0);

        let stats = response.alert_stats.unwrap();
        assert_eq!(stats.total_records, 47);
        assert_eq!(stats.estado_percent.microsleep, 3.2);
        assert_eq!(stats.estado_percent.fatigue, 18.5);
    }

    #[test]
    fn test_parse_empty_response_with_nulls() {
        let json = r#"{
            "alerts": [],
            "alert_stats": {"avg_perclos": null, "total_blinks": null, "total_yawns": null,
                            "estado_percent": null, "total_records": 0}
        }"#;

        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        assert!(response.alerts.is_empty());
        assert_eq!(response.alert_stats.unwrap().avg_perclos, 0.0);
    }

    #[test]
    fn test_float_record_count() {
        let json = r#"{
            "alerts": [],
            "alert_stats": {"avg_perclos": 12.0, "total_blinks": 3, "total_yawns": 1,
                            "estado_percent": {"NORMAL": 100}, "total_records": 47.0}
        }"#;
        let response: HistoryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.alert_stats.unwrap().total_records, 47);
    }

    #[test]
    fn test_fractional_record_count_rejected() {
        let json = r#"{"alerts": [], "alert_stats": {"total_records": 4.5}}"#;
        assert!(serde_json::from_str::<HistoryResponse>(json).is_err());

        let json = r#"{"alerts": [], "alert_stats": {"total_records": -1}}"#;
        assert!(serde_json::from_str::<HistoryResponse>(json).is_err());
    }

    #[test]
    fn test_record_to_sample() {
        let record = AlertRecord {
            time: "2025-10-05T10:15:00Z".into(),
            perclos: 72.5,
            blinks: 14.0,
            yawns: 6.0,
        };
        let sample = record.to_sample().unwrap();
        assert_eq!(sample.perclos, 72.5);
        assert_eq!(sample.blink_count, 14);
        assert_eq!(sample.yawn_count, 6);
        assert_eq!(sample.timestamp.to_rfc3339(), "2025-10-05T10:15:00+00:00");
        assert_eq!(dms::classify(&sample), dms::AlertnessState::Fatigue);
    }

    #[test]
    fn test_record_with_bad_time() {
        let record = AlertRecord {
            time: "soon".into(),
            perclos: 10.0,
            blinks: 1.0,
            yawns: 0.0,
        };
        assert!(matches!(record.to_sample(), Err(HistoryError::Parse(_))));
    }

    #[test]
    fn test_request_body() {
        let request = HistoryRequest {
            start: "2025-10-01T08:00:00.000-05:00".into(),
            end: "2025-11-01T18:00:00.000-05:00".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["start"], "2025-10-01T08:00:00.000-05:00");
        assert_eq!(json["end"], "2025-11-01T18:00:00.000-05:00");
    }
}
