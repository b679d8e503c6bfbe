//! Error types for fintrack-client

use thiserror::Error;

/// Failure classes used by the fallback policy and the page handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, timeout or other transport failure
    Unavailable,
    /// 401 or 403
    Unauthorized,
    /// 404
    NotFound,
    /// Any other 4xx, including validation failures
    Rejected,
    /// 5xx
    Server,
    /// Response body did not match the expected shape
    Decode,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Unavailable => write!(f, "UNAVAILABLE"),
            ErrorKind::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::Rejected => write!(f, "REJECTED"),
            ErrorKind::Server => write!(f, "SERVER_ERROR"),
            ErrorKind::Decode => write!(f, "DECODE_ERROR"),
        }
    }
}

fn with_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
}

/// API client error type
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    #[error("Finance API unreachable: {message}")]
    Unavailable { message: String },

    #[error("Not authorized (HTTP {status}){}", with_detail(.detail))]
    Unauthorized { status: u16, detail: Option<String> },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Request rejected (HTTP {status}){}", with_detail(.detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Server error (HTTP {status}){}", with_detail(.detail))]
    Server { status: u16, detail: Option<String> },

    #[error("Unexpected response body: {message}")]
    Decode { message: String },
}

impl ClientError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, resource: &str, detail: Option<String>) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized { status, detail },
            404 => ClientError::NotFound {
                resource: resource.to_string(),
            },
            500..=599 => ClientError::Server { status, detail },
            _ => ClientError::Rejected { status, detail },
        }
    }

    /// Rejection produced locally, e.g. by the mock store
    pub fn rejected(detail: impl Into<String>) -> Self {
        ClientError::Rejected {
            status: 400,
            detail: Some(detail.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unavailable { .. } => ErrorKind::Unavailable,
            ClientError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Rejected { .. } => ErrorKind::Rejected,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Message supplied by the server, suitable for showing to the user
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { detail, .. }
            | ClientError::Rejected { detail, .. }
            | ClientError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { status, .. }
            | ClientError::Rejected { status, .. }
            | ClientError::Server { status, .. } => Some(*status),
            ClientError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ClientError::Unavailable { .. } => vec![
                "Check that the finance API is running and api.base_url is correct.".to_string(),
                "Start with --fallback offline to use demo data meanwhile.".to_string(),
            ],
            ClientError::Unauthorized { .. } => vec!["Log in again.".to_string()],
            _ => vec![],
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Decode {
                message: error.to_string(),
            }
        } else {
            ClientError::Unavailable {
                message: error.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode {
            message: error.to_string(),
        }
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
