// Error handling framework

use thiserror::Error;

/// Message shown to the user for any failed log request
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch logs";

/// Log service request errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Log service request failed: {0}")]
    Transport(String),

    #[error("Log service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed log service response: {0}")]
    Decode(String),

    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Invalid log service URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Collapse every failure into the one condition the user sees
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "Job not found",
            _ => FETCH_FAILED_MESSAGE,
        }
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
            FetchError::NotFound(_) => "not_found",
            FetchError::InvalidUrl(_) => "invalid_url",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Route parsing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown route: {0}")]
    Unknown(String),

    #[error("Missing job id in route: {0}")]
    MissingJobId(String),
}

/// Filter input errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),
}
