//! Query classification.
//!
//! Decides how a raw query is phrased for the volumes endpoint. Rules are
//! tried in a fixed order and the first that matches wins:
//!
//! 1. ISBN-13 (`978`/`979` prefix) anywhere in the text
//! 2. ISBN-10 anywhere in the text
//! 3. an explicit author marker ("by", "author:", "written by")
//! 4. short, digit-free text is a bare title
//! 5. anything else is a general query

use regex::Regex;
use std::sync::OnceLock;

use crate::models::SearchMode;

/// Titles at or above this many characters are searched as general text
const MAX_TITLE_CHARS: usize = 100;

static ISBN13_PATTERN: OnceLock<Regex> = OnceLock::new();
static ISBN10_PATTERN: OnceLock<Regex> = OnceLock::new();
static AUTHOR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn isbn13_pattern() -> &'static Regex {
    ISBN13_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?-u:\b)(97[89][-\s]?[0-9]{1,5}[-\s]?[0-9]{1,7}[-\s]?[0-9]{1,7}[-\s]?[0-9])(?-u:\b)",
        )
        .expect("ISBN-13 pattern is valid")
    })
}

fn isbn10_pattern() -> &'static Regex {
    ISBN10_PATTERN.get_or_init(|| {
        Regex::new(r"(?-u:\b)([0-9]{1,5}[-\s]?[0-9]{1,7}[-\s]?[0-9]{1,7}[-\s]?[0-9])(?-u:\b)")
            .expect("ISBN-10 pattern is valid")
    })
}

fn author_pattern() -> &'static Regex {
    AUTHOR_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)(?:by|author:|written by)\s+([^,\n]+)")
            .expect("author pattern is valid")
    })
}

/// Outcome of classifying a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    /// Query string to send to the search collaborator
    pub query: String,

    /// Mode the query was classified as
    pub mode: SearchMode,

    /// Cleaned ISBN (10 or 13 digits) when `mode` is `Identifier`
    pub isbn: Option<String>,
}

impl ClassifiedQuery {
    fn identifier(isbn: String) -> Self {
        Self {
            query: format!("isbn:{}", isbn),
            mode: SearchMode::Identifier,
            isbn: Some(isbn),
        }
    }

    fn text(query: String, mode: SearchMode) -> Self {
        Self {
            query,
            mode,
            isbn: None,
        }
    }
}

/// Classify a raw query.
///
/// Never fails: input that matches nothing more specific ends up as a
/// [`SearchMode::General`] query. Emptiness is checked by the caller.
pub fn classify(input: &str) -> ClassifiedQuery {
    let input = input.trim();

    let classified = if let Some(isbn) = detect_isbn13(input) {
        ClassifiedQuery::identifier(isbn)
    } else if let Some(isbn) = detect_isbn10(input) {
        ClassifiedQuery::identifier(isbn)
    } else if has_author_marker(input) {
        // Natural-language phrasing matches better than intitle:/inauthor: here
        ClassifiedQuery::text(input.to_string(), SearchMode::TitleAuthor)
    } else if looks_like_title(input) {
        ClassifiedQuery::text(format!("intitle:\"{}\"", input), SearchMode::Title)
    } else {
        ClassifiedQuery::text(input.to_string(), SearchMode::General)
    };

    tracing::debug!(
        mode = classified.mode.id(),
        query = %classified.query,
        "Classified search query"
    );

    classified
}

/// Find the first ISBN-13 shaped run and validate it
pub fn detect_isbn13(input: &str) -> Option<String> {
    let candidate = isbn13_pattern().captures(input)?.get(1)?.as_str();
    let isbn = clean_isbn(candidate);
    validate_isbn13(&isbn).then_some(isbn)
}

/// Find the first ISBN-10 shaped run and validate it
pub fn detect_isbn10(input: &str) -> Option<String> {
    let candidate = isbn10_pattern().captures(input)?.get(1)?.as_str();
    let isbn = clean_isbn(candidate);
    validate_isbn10(&isbn).then_some(isbn)
}

/// Whether the query names an author explicitly
pub fn has_author_marker(input: &str) -> bool {
    author_pattern().is_match(input)
}

fn looks_like_title(input: &str) -> bool {
    !input.chars().any(|c| c.is_ascii_digit()) && input.chars().count() < MAX_TITLE_CHARS
}

/// Remove hyphens and spaces from an ISBN
pub fn clean_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Structural check only: 10 ASCII digits, no checksum
pub fn validate_isbn10(isbn: &str) -> bool {
    isbn.len() == 10 && is_all_digits(isbn)
}

/// Structural check only: 13 ASCII digits with a 978/979 prefix, no checksum
pub fn validate_isbn13(isbn: &str) -> bool {
    isbn.len() == 13
        && is_all_digits(isbn)
        && (isbn.starts_with("978") || isbn.starts_with("979"))
}

fn is_all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
