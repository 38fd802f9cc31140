// src/error.rs

use std::fmt;

/// Global application error enum.
/// Every backend failure is normalized into one of these variants before it
/// crosses into store or workflow code; raw transport errors never escape the
/// API client.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    // 400 Bad Request with a server-provided message
    Validation(String),

    // 401 Unauthorized (local credentials are cleared as a side effect)
    AuthRequired,

    // 402 Payment Required with code "Ad viewing required"
    AdRequired,

    // 402 Payment Required with code "Insufficient credits"
    InsufficientCredits,

    // 404 Not Found
    NotFound,

    // Connectivity failure before any HTTP status was received
    Network(String),

    // Local precondition violated (e.g. ad countdown not finished);
    // the backend is never contacted
    Precondition(String),

    // Persisted client-state file could not be read or written
    Storage(String),

    // Catch-all for any other failure
    Unexpected(String),
}

impl AppError {
    /// Human-readable message suitable for direct display.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation error: {}", msg),
            AppError::AuthRequired => "Authentication required".to_string(),
            AppError::AdRequired => "Ad viewing required".to_string(),
            AppError::InsufficientCredits => "Insufficient credits".to_string(),
            AppError::NotFound => "Resource not found".to_string(),
            AppError::Network(_) => "Network error - please check your connection".to_string(),
            AppError::Precondition(msg) => msg.clone(),
            AppError::Storage(msg) => format!("Local storage error: {}", msg),
            AppError::Unexpected(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

/// Converts `serde_json::Error` into `AppError::Unexpected`.
/// Allows using the `?` operator on response body decoding.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Unexpected(format!("Malformed response body: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Converts transport-level `reqwest::Error` values.
/// Anything that failed before a status line arrived counts as a network
/// failure; everything else is unexpected.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            AppError::Network(err.to_string())
        } else {
            AppError::Unexpected(err.to_string())
        }
    }
}
