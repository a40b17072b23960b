//! Application errors and their stable codes.

use std::time::Duration;

use crate::sources::SourceError;

/// Coarse error classification shared with callers (CLI, servers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Invalid,
    NotFound,
    Unavailable,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Invalid => "invalid",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the search pipeline
#[derive(Debug, thiserror::Error)]
pub enum BookIdError {
    /// The query was rejected before classification
    #[error("bookid error: code=invalid message={0}")]
    InvalidInput(String),

    /// The search collaborator failed; passed through unchanged
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The search did not finish before the deadline
    #[error("search timed out after {0:?}")]
    Timeout(Duration),
}

impl BookIdError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BookIdError::InvalidInput(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BookIdError::InvalidInput(_) => ErrorCode::Invalid,
            BookIdError::Source(SourceError::NotFound(_)) => ErrorCode::NotFound,
            BookIdError::Source(SourceError::RateLimit(_)) | BookIdError::Timeout(_) => {
                ErrorCode::Unavailable
            }
            BookIdError::Source(_) => ErrorCode::Internal,
        }
    }

    /// Message safe to show an end user. Internal details are hidden.
    pub fn user_message(&self) -> String {
        match self {
            BookIdError::InvalidInput(message) => message.clone(),
            BookIdError::Source(SourceError::NotFound(message)) => message.clone(),
            BookIdError::Source(SourceError::RateLimit(_)) | BookIdError::Timeout(_) => {
                "Search service unavailable, try again later.".to_string()
            }
            _ => "Internal error.".to_string(),
        }
    }
}
