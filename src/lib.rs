//! # bookid
//!
//! Resolve a free-form query (an ISBN, a title, "title by author" or any
//! text) into a list of candidate books with confidence scores.
//!
//! ## Architecture
//!
//! - [`search`]: query classification, confidence scoring and the [`BookFinder`] pipeline
//! - [`models`]: core data structures ([`BookResult`], [`SearchMode`], vendor records)
//! - [`sources`]: search backends behind the [`Source`] trait
//! - [`config`]: configuration management
//! - [`error`]: application errors
//! - [`utils`]: HTTP client and parsing helpers

pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use error::{BookIdError, ErrorCode};
pub use models::{BookResult, SearchMode};
pub use search::{classify, BookFinder, ClassifiedQuery};
pub use sources::{Source, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
