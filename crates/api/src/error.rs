//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dms::DmsError;
use history_query::{ErrorKind, HistoryError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while configuring or running the dashboard server
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classifier configuration error: {0}")]
    Classifier(#[from] DmsError),

    #[error("History pipeline error: {0}")]
    History(#[from] HistoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("Metrics recorder initialization failed: {0}")]
    Metrics(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

/// JSON error body returned by every failing handler
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Handler error wrapping a historical query failure
#[derive(Debug)]
pub struct AppError(pub HistoryError);

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        AppError(err)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Input => StatusCode::BAD_REQUEST,
            ErrorKind::Busy => StatusCode::CONFLICT,
            ErrorKind::Retrieval => StatusCode::BAD_GATEWAY,
            ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self.0.kind() {
            ErrorKind::Input => "INVALID_RANGE",
            ErrorKind::Busy => "QUERY_IN_PROGRESS",
            ErrorKind::Retrieval => "RETRIEVAL_FAILED",
            ErrorKind::Config => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<String> {
        match &self.0 {
            HistoryError::MissingField(field) => Some(format!("field: {field}")),
            HistoryError::InvalidTimestamp { field, .. } => Some(format!("field: {field}")),
            HistoryError::Status(code) => Some(format!("upstream status: {code}")),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.0.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}
