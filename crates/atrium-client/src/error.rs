use reqwest::StatusCode;
use thiserror::Error;

/// Error type for backend API operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("rejected before upload: {0}")]
    InvalidUpload(String),
}

impl ApiError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// True when the backend rejected the session (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
