//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{CandidateRecord, IndustryIdentifier, VolumeInfo};
use crate::sources::{Source, SourceError};

/// A mock source that returns predefined records and remembers the
/// queries it was asked.
#[derive(Debug, Default)]
pub struct MockSource {
    records: Mutex<Vec<CandidateRecord>>,
    error: Mutex<Option<String>>,
    queries: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source that returns no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source preloaded with records.
    pub fn with_records(records: Vec<CandidateRecord>) -> Self {
        let source = Self::new();
        source.set_records(records);
        source
    }

    /// Set the records to return.
    pub fn set_records(&self, records: Vec<CandidateRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Make every search fail with a network error carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.error.lock().unwrap() = Some(message.into());
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &str) -> Result<Vec<CandidateRecord>, SourceError> {
        self.queries.lock().unwrap().push(query.to_string());

        if let Some(message) = self.error.lock().unwrap().as_ref() {
            return Err(SourceError::Network(message.clone()));
        }

        Ok(self.records.lock().unwrap().clone())
    }
}

/// Helper function to create a mock record for testing.
pub fn make_record(id: &str, title: &str, authors: &[&str], isbn13: Option<&str>) -> CandidateRecord {
    CandidateRecord {
        id: Some(id.to_string()),
        volume_info: Some(VolumeInfo {
            title: Some(title.to_string()),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            industry_identifiers: isbn13
                .map(|isbn| vec![IndustryIdentifier::new("ISBN_13", isbn)])
                .unwrap_or_default(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
