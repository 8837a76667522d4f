//! Historical data service client

use crate::error::HistoryError;
use crate::normalize::TimezonePolicy;
use crate::wire::{HistoryRequest, HistoryResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Historical pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// URL of the range query endpoint
    pub endpoint: String,
    /// How operator input is turned into instants
    pub timezone: TimezonePolicy,
    /// Request timeout; unset means transport failure is the only failure signal
    pub request_timeout_ms: Option<u64>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/alerts/history".to_string(),
            timezone: TimezonePolicy::default(),
            request_timeout_ms: None,
        }
    }
}

/// Source of historical alert records and aggregates
#[async_trait]
pub trait HistoryService: Send + Sync {
    async fn query(&self, request: &HistoryRequest) -> Result<HistoryResponse, HistoryError>;
}

/// Queries the service over HTTP with a JSON `POST`
#[derive(Debug, Clone)]
pub struct HttpHistoryService {
    client: Client,
    endpoint: String,
}

impl HttpHistoryService {
    pub fn new(config: &HistoryConfig) -> Result<Self, HistoryError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder
            .build()
            .map_err(|e| HistoryError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HistoryService for HttpHistoryService {
    async fn query(&self, request: &HistoryRequest) -> Result<HistoryResponse, HistoryError> {
        debug!("POST {} ({} -> {})", self.endpoint, request.start, request.end);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HistoryError::Status(response.status().as_u16()));
        }

        response
            .json::<HistoryResponse>()
            .await
            .map_err(|e| HistoryError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/alerts/history")
    }

    fn service(endpoint: String) -> HttpHistoryService {
        HttpHistoryService::new(&HistoryConfig {
            endpoint,
            ..Default::default()
        })
        .unwrap()
    }

    fn request() -> HistoryRequest {
        HistoryRequest {
            start: "2025-10-01T08:00:00.000-05:00".into(),
            end: "2025-11-01T18:00:00.000-05:00".into(),
        }
    }

    #[tokio::test]
    async fn test_posts_range_and_decodes() {
        let app = Router::new().route(
            "/alerts/history",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "alerts": [{"time": body["start"], "perclos": 65.0, "blinks": 9, "yawns": 6}],
                    "alert_stats": {
                        "avg_perclos": 65.0, "total_blinks": 9, "total_yawns": 6,
                        "estado_percent": {"NORMAL": 0, "FATIGA": 100, "SOMNOLENCIA": 0, "MICROSUEÑO": 0},
                        "total_records": 1
                    }
                }))
            }),
        );
        let service = service(serve(app).await);

        let response = service.query(&request()).await.unwrap();
        assert_eq!(response.alerts.len(), 1);
        assert_eq!(response.alerts[0].time, "2025-10-01T08:00:00.000-05:00");
        assert_eq!(response.alert_stats.unwrap().estado_percent.fatigue, 100.0);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let app = Router::new().route(
            "/alerts/history",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let service = service(serve(app).await);

        let err = service.query(&request()).await.unwrap_err();
        assert_eq!(err, HistoryError::Status(500));
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let app = Router::new().route("/alerts/history", post(|| async { "not json" }));
        let service = service(serve(app).await);

        let err = service.query(&request()).await.unwrap_err();
        assert!(matches!(err, HistoryError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port with no listener
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = service(format!("http://{addr}/alerts/history"));
        let err = service.query(&request()).await.unwrap_err();
        assert!(matches!(err, HistoryError::Connection(_)));
    }
}
