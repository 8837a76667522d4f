//! Historical Query Error Types

use thiserror::Error;

/// How an error is surfaced to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad form input; nothing was requested
    Input,
    /// A query is already loading
    Busy,
    /// The service could not be reached or answered badly
    Retrieval,
    /// Invalid pipeline configuration
    Config,
}

/// Errors raised by the historical query pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    /// Range endpoint left empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Range endpoint not in `YYYY-MM-DDTHH:MM[:SS]` form
    #[error("Invalid {field} date/time '{value}': expected YYYY-MM-DDTHH:MM")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Start not strictly before end
    #[error("Start {start} must be before end {end}")]
    InvertedRange { start: String, end: String },

    #[error("A historical query is already in progress")]
    Busy,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Service answered with a non-success status
    #[error("History service returned status {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HistoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HistoryError::MissingField(_)
            | HistoryError::InvalidTimestamp { .. }
            | HistoryError::InvertedRange { .. } => ErrorKind::Input,
            HistoryError::Busy => ErrorKind::Busy,
            HistoryError::Connection(_)
            | HistoryError::Timeout
            | HistoryError::Http(_)
            | HistoryError::Status(_)
            | HistoryError::Parse(_) => ErrorKind::Retrieval,
            HistoryError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<reqwest::Error> for HistoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HistoryError::Timeout
        } else if err.is_connect() {
            HistoryError::Connection(err.to_string())
        } else if err.is_decode() {
            HistoryError::Parse(err.to_string())
        } else {
            HistoryError::Http(err.to_string())
        }
    }
}
