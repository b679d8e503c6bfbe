//! Error types for fintrack-core

use std::io;
use thiserror::Error;

/// Session errors raised by the auth context and token stores
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session storage error: {message}")]
    StorageError { message: String },

    #[error("Unauthorized access")]
    Unauthorized,
}

impl CoreError {
    /// Hint logged next to the error
    pub fn suggestion(&self) -> &'static str {
        match self {
            CoreError::StorageError { .. } => "Check that the session.token_file directory is writable.",
            CoreError::Unauthorized => "Log in again to refresh the session.",
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::StorageError {
            message: error.to_string(),
        }
    }
}
