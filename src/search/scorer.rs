//! Confidence scoring and projection of vendor records into [`BookResult`]s.
//!
//! Confidence is `base(mode) * (0.7 + 0.3 * completeness)`, where
//! completeness is the fraction of four key fields present on the record
//! (title, authors, identifiers, publisher). The search mode dominates and
//! completeness can only pull a score down to 70% of its base.

use crate::models::{BookResult, BookResultBuilder, CandidateRecord, SearchMode, VolumeInfo};

/// Share of the base confidence kept by a record with no key fields
const COMPLETENESS_FLOOR: f64 = 0.7;

/// Share of the base confidence earned by key fields
const COMPLETENESS_WEIGHT: f64 = 0.3;

/// Published years outside (MIN_YEAR, MAX_YEAR) are discarded
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 3000;

/// Base confidence for each search mode
pub fn base_confidence(mode: SearchMode) -> f64 {
    match mode {
        SearchMode::Identifier => 0.95,
        SearchMode::TitleAuthor => 0.85,
        SearchMode::Title => 0.70,
        SearchMode::General => 0.50,
    }
}

/// Fraction of key metadata fields present, in [0, 1]
pub fn completeness(record: &CandidateRecord) -> f64 {
    let Some(info) = record.volume_info.as_ref() else {
        return 0.0;
    };

    let signals = [
        info.title.as_deref().is_some_and(|t| !t.is_empty()),
        !info.authors.is_empty(),
        !info.industry_identifiers.is_empty(),
        info.publisher.as_deref().is_some_and(|p| !p.is_empty()),
    ];

    let present = signals.iter().filter(|s| **s).count();
    present as f64 / signals.len() as f64
}

/// Confidence that `record` is the book the user meant
pub fn score(mode: SearchMode, record: &CandidateRecord) -> f64 {
    let confidence =
        base_confidence(mode) * (COMPLETENESS_FLOOR + COMPLETENESS_WEIGHT * completeness(record));
    confidence.clamp(0.0, 1.0)
}

/// Project a vendor record into a scored [`BookResult`].
///
/// `detected_isbn` is the identifier found during classification, if any.
/// It back-fills the matching ISBN slot when the vendor did not list it.
pub fn project(
    record: &CandidateRecord,
    mode: SearchMode,
    detected_isbn: Option<&str>,
) -> BookResult {
    let default_info = VolumeInfo::default();
    let info = record.volume_info.as_ref().unwrap_or(&default_info);

    let mut builder = BookResultBuilder::new(info.title.clone().unwrap_or_default(), mode)
        .authors(info.authors.clone())
        .confidence(score(mode, record));

    let (mut isbn10, mut isbn13) = (None, None);
    for identifier in &info.industry_identifiers {
        if identifier.is_isbn10() {
            isbn10 = Some(identifier.identifier.clone());
        } else if identifier.is_isbn13() {
            isbn13 = Some(identifier.identifier.clone());
        }
    }

    if let Some(detected) = detected_isbn {
        let listed = info
            .industry_identifiers
            .iter()
            .any(|i| i.identifier == detected);
        if !listed {
            match detected.len() {
                10 if isbn10.is_none() => isbn10 = Some(detected.to_string()),
                13 if isbn13.is_none() => isbn13 = Some(detected.to_string()),
                _ => {}
            }
        }
    }

    if let Some(isbn) = isbn10 {
        builder = builder.isbn10(isbn);
    }
    if let Some(isbn) = isbn13 {
        builder = builder.isbn13(isbn);
    }
    if let Some(publisher) = non_empty(&info.publisher) {
        builder = builder.publisher(publisher);
    }
    if let Some(year) = info.published_date.as_deref().and_then(extract_year) {
        builder = builder.published_year(year);
    }
    if let Some(language) = non_empty(&info.language) {
        builder = builder.language(language);
    }
    if let Some(id) = non_empty(&record.id) {
        builder = builder.volume_id(id);
    }
    if let Some(url) = thumbnail(info) {
        builder = builder.thumbnail_url(ensure_https(url));
    }

    match serde_json::to_value(record) {
        Ok(raw) => builder = builder.raw(raw),
        Err(e) => tracing::debug!("Dropping raw payload for {:?}: {}", record.id, e),
    }

    builder.build()
}

/// Leading year of a date such as "1925", "2004-09" or "2004-09-30"
pub fn extract_year(date: &str) -> Option<i32> {
    let token = date.split('-').next()?;
    let year: i32 = token.parse().ok()?;
    (year > MIN_YEAR && year < MAX_YEAR).then_some(year)
}

/// Rewrite a leading `http://` to `https://`, leaving the rest untouched
pub fn ensure_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

fn thumbnail(info: &VolumeInfo) -> Option<&str> {
    let links = info.image_links.as_ref()?;
    non_empty(&links.thumbnail).or_else(|| non_empty(&links.small_thumbnail))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageLinks, IndustryIdentifier};
    use proptest::prelude::*;

    fn full_record() -> CandidateRecord {
        CandidateRecord {
            id: Some("iXn5U2IzVH0C".to_string()),
            volume_info: Some(VolumeInfo {
                title: Some("The Great Gatsby".to_string()),
                authors: vec!["F. Scott Fitzgerald".to_string()],
                industry_identifiers: vec![IndustryIdentifier::new("ISBN_13", "9780743273565")],
                publisher: Some("Scribner".to_string()),
                published_date: Some("2004-09-30".to_string()),
                language: Some("en".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_base_confidence_is_ordered_by_specificity() {
        assert!(base_confidence(SearchMode::Identifier) > base_confidence(SearchMode::TitleAuthor));
        assert!(base_confidence(SearchMode::TitleAuthor) > base_confidence(SearchMode::Title));
        assert!(base_confidence(SearchMode::Title) > base_confidence(SearchMode::General));
    }

    #[test]
    fn test_complete_record_scores_base() {
        assert_close(score(SearchMode::Identifier, &full_record()), 0.95);
        assert_close(score(SearchMode::General, &full_record()), 0.50);
    }

    #[test]
    fn test_missing_publisher() {
        let mut record = full_record();
        record.volume_info.as_mut().unwrap().publisher = None;

        assert_close(completeness(&record), 0.75);
        assert_close(score(SearchMode::Identifier, &record), 0.95 * 0.925);
    }

    #[test]
    fn test_empty_strings_do_not_count() {
        let mut record = full_record();
        let info = record.volume_info.as_mut().unwrap();
        info.title = Some(String::new());
        info.publisher = Some(String::new());

        assert_close(completeness(&record), 0.5);
    }

    #[test]
    fn test_record_without_volume_info_keeps_floor() {
        let record = CandidateRecord::default();
        assert_close(completeness(&record), 0.0);
        assert_close(score(SearchMode::General, &record), 0.35);
        assert_close(score(SearchMode::Identifier, &record), 0.95 * 0.7);
    }

    #[test]
    fn test_project_full_record() {
        let result = project(&full_record(), SearchMode::Identifier, Some("9780743273565"));

        assert_eq!(result.title, "The Great Gatsby");
        assert_eq!(result.authors, vec!["F. Scott Fitzgerald"]);
        assert_eq!(result.isbn13.as_deref(), Some("9780743273565"));
        assert_eq!(result.isbn10, None);
        assert_eq!(result.publisher.as_deref(), Some("Scribner"));
        assert_eq!(result.published_year, Some(2004));
        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(result.google_books_volume_id.as_deref(), Some("iXn5U2IzVH0C"));
        assert_eq!(result.search_type, SearchMode::Identifier);
        assert_close(result.confidence, 0.95);

        let raw = result.google_books_data.expect("raw payload kept");
        assert_eq!(raw["id"], "iXn5U2IzVH0C");
        assert_eq!(raw["volumeInfo"]["title"], "The Great Gatsby");
    }

    #[test]
    fn test_detected_isbn_backfills_missing_slot() {
        let mut record = full_record();
        record.volume_info.as_mut().unwrap().industry_identifiers.clear();

        let result = project(&record, SearchMode::Identifier, Some("0743273567"));
        assert_eq!(result.isbn10.as_deref(), Some("0743273567"));
        assert_eq!(result.isbn13, None);

        let result = project(&record, SearchMode::Identifier, Some("9780743273565"));
        assert_eq!(result.isbn13.as_deref(), Some("9780743273565"));
        assert_eq!(result.isbn10, None);
    }

    #[test]
    fn test_detected_isbn10_fills_slot_next_to_vendor_isbn13() {
        let result = project(&full_record(), SearchMode::Identifier, Some("0743273567"));
        assert_eq!(result.isbn10.as_deref(), Some("0743273567"));
        assert_eq!(result.isbn13.as_deref(), Some("9780743273565"));
    }

    #[test]
    fn test_vendor_isbn_is_not_overwritten() {
        let mut record = full_record();
        record
            .volume_info
            .as_mut()
            .unwrap()
            .industry_identifiers
            .push(IndustryIdentifier::new("ISBN_10", "0743273567"));

        let result = project(&record, SearchMode::Identifier, Some("1234567890"));
        assert_eq!(result.isbn10.as_deref(), Some("0743273567"));
    }

    #[test]
    fn test_authors_keep_order_and_duplicates() {
        let mut record = full_record();
        record.volume_info.as_mut().unwrap().authors =
            vec!["B".to_string(), "A".to_string(), "B".to_string()];

        let result = project(&record, SearchMode::Title, None);
        assert_eq!(result.authors, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("1925"), Some(1925));
        assert_eq!(extract_year("2004-09-30"), Some(2004));
        assert_eq!(extract_year("2004-09"), Some(2004));
        assert_eq!(extract_year("1000"), None);
        assert_eq!(extract_year("3000"), None);
        assert_eq!(extract_year("0999-01-01"), None);
        assert_eq!(extract_year("circa 1925"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_ensure_https() {
        assert_eq!(
            ensure_https("http://books.google.com/books/content?id=1"),
            "https://books.google.com/books/content?id=1"
        );
        assert_eq!(
            ensure_https("http://example.com/img?fallback=http://cdn.example.com/x.jpg"),
            "https://example.com/img?fallback=http://cdn.example.com/x.jpg"
        );
        assert_eq!(ensure_https("https://example.com/a"), "https://example.com/a");
        assert_eq!(ensure_https(""), "");
    }

    #[test]
    fn test_thumbnail_preference() {
        let mut record = full_record();
        record.volume_info.as_mut().unwrap().image_links = Some(ImageLinks {
            small_thumbnail: Some("http://books.google.com/small".to_string()),
            thumbnail: Some("http://books.google.com/large".to_string()),
            ..Default::default()
        });
        let result = project(&record, SearchMode::Title, None);
        assert_eq!(
            result.thumbnail_url.as_deref(),
            Some("https://books.google.com/large")
        );

        record
            .volume_info
            .as_mut()
            .unwrap()
            .image_links
            .as_mut()
            .unwrap()
            .thumbnail = None;
        let result = project(&record, SearchMode::Title, None);
        assert_eq!(
            result.thumbnail_url.as_deref(),
            Some("https://books.google.com/small")
        );
    }

    #[test]
    fn test_sparse_record_projects_without_error() {
        let result = project(&CandidateRecord::default(), SearchMode::General, None);
        assert_eq!(result.title, "");
        assert!(result.authors.is_empty());
        assert_eq!(result.published_year, None);
        assert_eq!(result.thumbnail_url, None);
        assert_close(result.confidence, 0.35);
    }

    #[test]
    fn test_project_is_deterministic() {
        let record = full_record();
        assert_eq!(
            project(&record, SearchMode::Identifier, Some("0743273567")),
            project(&record, SearchMode::Identifier, Some("0743273567"))
        );
    }

    fn mode_strategy() -> impl Strategy<Value = SearchMode> {
        prop_oneof![
            Just(SearchMode::Identifier),
            Just(SearchMode::TitleAuthor),
            Just(SearchMode::Title),
            Just(SearchMode::General),
        ]
    }

    fn record_with(signals: [bool; 4]) -> CandidateRecord {
        let [title, authors, ids, publisher] = signals;
        CandidateRecord {
            volume_info: Some(VolumeInfo {
                title: title.then(|| "Title".to_string()),
                authors: if authors { vec!["Author".to_string()] } else { vec![] },
                industry_identifiers: if ids {
                    vec![IndustryIdentifier::new("ISBN_10", "0743273567")]
                } else {
                    vec![]
                },
                publisher: publisher.then(|| "Publisher".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(mode in mode_strategy(), signals in any::<[bool; 4]>()) {
            let confidence = score(mode, &record_with(signals));
            prop_assert!(confidence >= 0.35 - 1e-9);
            prop_assert!(confidence <= 0.95 + 1e-9);
            prop_assert!(confidence <= base_confidence(mode) + 1e-9);
        }

        #[test]
        fn prop_score_is_monotonic_in_completeness(
            mode in mode_strategy(),
            signals in any::<[bool; 4]>(),
            extra in 0usize..4,
        ) {
            let mut more = signals;
            more[extra] = true;

            let fewer_score = score(mode, &record_with(signals));
            let more_score = score(mode, &record_with(more));
            prop_assert!(more_score >= fewer_score);
        }
    }
}
