//! Search collaborators that turn a rewritten query into vendor records.
//!
//! This module defines the [`Source`] trait the search pipeline talks to.
//! Transport, authentication and vendor quirks live behind it; the pipeline
//! only sees a list of [`CandidateRecord`]s or a [`SourceError`].
//!
//! # Feature Flags
//!
//! - `google_books` - Enable the Google Books source (default: enabled)
//!
//! [`MockSource`] is always available and returns canned records, which is
//! what the tests use.

#[cfg(feature = "source-google_books")]
mod google_books;

pub mod mock;

#[cfg(feature = "source-google_books")]
pub use google_books::GoogleBooksSource;
pub use mock::MockSource;

use crate::models::CandidateRecord;
use async_trait::async_trait;

/// A bibliographic search backend.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Map the backend's response into [`CandidateRecord`]s, keeping the
///    backend's result order
/// 3. Report transport failures as [`SourceError::Network`] and quota
///    exhaustion as [`SourceError::RateLimit`]
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "google_books")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Run a search with an already rewritten query string
    async fn search(&self, query: &str) -> Result<Vec<CandidateRecord>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
