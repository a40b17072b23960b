//! Book result model produced for every candidate returned by a search.

use serde::{Deserialize, Serialize};

/// How a query was phrased for the outbound search.
///
/// Variants are listed from most to least specific; classification always
/// picks the most specific one that matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMode {
    /// An ISBN-10 or ISBN-13 was found in the query
    #[serde(rename = "isbn")]
    Identifier,
    /// The query names an author ("by ...", "author: ...", "written by ...")
    #[serde(rename = "title_author")]
    TitleAuthor,
    /// Short, digit-free text treated as a bare title
    #[serde(rename = "title")]
    Title,
    /// Anything else
    #[serde(rename = "general")]
    General,
}

impl SearchMode {
    /// Returns the stable identifier used in serialized output
    pub fn id(&self) -> &'static str {
        match self {
            SearchMode::Identifier => "isbn",
            SearchMode::TitleAuthor => "title_author",
            SearchMode::Title => "title",
            SearchMode::General => "general",
        }
    }

    /// Returns a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Identifier => "ISBN",
            SearchMode::TitleAuthor => "Title + author",
            SearchMode::Title => "Title",
            SearchMode::General => "General",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A normalized book record with its confidence score.
///
/// Carries everything needed to create a work, its authors and a specific
/// publication downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResult {
    /// Title as reported by the vendor
    pub title: String,

    /// Authors in vendor order, duplicates preserved
    pub authors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Year parsed from the vendor's publication date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,

    /// Language code (e.g. "en")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_books_volume_id: Option<String>,

    /// Cover thumbnail, always https when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Raw vendor record, kept verbatim for auditing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_books_data: Option<serde_json::Value>,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Mode used to find this result
    pub search_type: SearchMode,
}

impl BookResult {
    /// Create a result with only the required fields set
    pub fn new(title: impl Into<String>, search_type: SearchMode) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            isbn10: None,
            isbn13: None,
            publisher: None,
            published_year: None,
            language: None,
            google_books_volume_id: None,
            thumbnail_url: None,
            google_books_data: None,
            confidence: 0.0,
            search_type,
        }
    }

    /// Returns the most specific ISBN available (ISBN-13 preferred)
    pub fn primary_isbn(&self) -> Option<&str> {
        self.isbn13.as_deref().or(self.isbn10.as_deref())
    }

    /// Returns authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Drop the raw vendor payload
    pub fn without_raw(mut self) -> Self {
        self.google_books_data = None;
        self
    }
}

/// Builder for constructing BookResult objects
#[derive(Debug, Clone)]
pub struct BookResultBuilder {
    result: BookResult,
}

impl BookResultBuilder {
    pub fn new(title: impl Into<String>, search_type: SearchMode) -> Self {
        Self {
            result: BookResult::new(title, search_type),
        }
    }

    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.result.authors = authors;
        self
    }

    pub fn isbn10(mut self, isbn: impl Into<String>) -> Self {
        self.result.isbn10 = Some(isbn.into());
        self
    }

    pub fn isbn13(mut self, isbn: impl Into<String>) -> Self {
        self.result.isbn13 = Some(isbn.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.result.publisher = Some(publisher.into());
        self
    }

    pub fn published_year(mut self, year: i32) -> Self {
        self.result.published_year = Some(year);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.result.language = Some(language.into());
        self
    }

    pub fn volume_id(mut self, id: impl Into<String>) -> Self {
        self.result.google_books_volume_id = Some(id.into());
        self
    }

    pub fn thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.result.thumbnail_url = Some(url.into());
        self
    }

    pub fn raw(mut self, raw: serde_json::Value) -> Self {
        self.result.google_books_data = Some(raw);
        self
    }

    /// Set confidence, clamped to [0, 1]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.result.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn build(self) -> BookResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&SearchMode::Identifier).unwrap(),
            "\"isbn\""
        );
        assert_eq!(
            serde_json::to_string(&SearchMode::TitleAuthor).unwrap(),
            "\"title_author\""
        );
        assert_eq!(
            serde_json::from_str::<SearchMode>("\"general\"").unwrap(),
            SearchMode::General
        );
        assert_eq!(SearchMode::Title.id(), "title");
    }

    #[test]
    fn test_book_result_builder() {
        let result = BookResultBuilder::new("The Great Gatsby", SearchMode::Identifier)
            .authors(vec!["F. Scott Fitzgerald".to_string()])
            .isbn13("9780743273565")
            .publisher("Scribner")
            .published_year(2004)
            .confidence(0.95)
            .build();

        assert_eq!(result.title, "The Great Gatsby");
        assert_eq!(result.primary_isbn(), Some("9780743273565"));
        assert_eq!(result.published_year, Some(2004));
        assert_eq!(result.search_type, SearchMode::Identifier);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let high = BookResultBuilder::new("x", SearchMode::General)
            .confidence(1.7)
            .build();
        let low = BookResultBuilder::new("x", SearchMode::General)
            .confidence(-0.2)
            .build();
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let result = BookResult::new("Dune", SearchMode::Title);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["title"], "Dune");
        assert_eq!(json["search_type"], "title");
        assert!(json.get("isbn10").is_none());
        assert!(json.get("google_books_data").is_none());
    }
}
