//! Query classification, confidence scoring and the search pipeline.
//!
//! - [`classify`]: turn raw user text into a [`ClassifiedQuery`]
//! - [`score`] / [`project`]: score a vendor record and map it into a [`BookResult`](crate::models::BookResult)
//! - [`BookFinder`]: run classify, search and project for one query
//!
//! # Example
//!
//! ```rust
//! use bookid::models::SearchMode;
//! use bookid::search::classify;
//!
//! let classified = classify("978-0-7432-7356-5");
//! assert_eq!(classified.mode, SearchMode::Identifier);
//! assert_eq!(classified.query, "isbn:9780743273565");
//! ```

mod classifier;
mod finder;
mod scorer;

pub use classifier::{
    classify, clean_isbn, detect_isbn10, detect_isbn13, has_author_marker, validate_isbn10,
    validate_isbn13, ClassifiedQuery,
};
pub use finder::{BookFinder, SearchOutcome};
pub use scorer::{base_confidence, completeness, ensure_https, extract_year, project, score};
