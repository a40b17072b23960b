//! The search pipeline: classify, search, project.

use std::sync::Arc;
use std::time::Duration;

use crate::error::BookIdError;
use crate::models::BookResult;
use crate::search::{classify, project, ClassifiedQuery};
use crate::sources::Source;

/// Results of one search together with how the query was classified
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub classified: ClassifiedQuery,

    /// Results in the order the source returned them
    pub results: Vec<BookResult>,
}

/// Resolves free-form queries into scored [`BookResult`]s using a [`Source`]
#[derive(Debug, Clone)]
pub struct BookFinder {
    source: Arc<dyn Source>,
    timeout: Duration,
}

impl BookFinder {
    pub fn new(source: Arc<dyn Source>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// The source searches are sent to
    pub fn source(&self) -> &Arc<dyn Source> {
        &self.source
    }

    /// Search for books matching `query`.
    ///
    /// An empty list is a valid outcome. Source failures are returned
    /// unchanged inside [`BookIdError::Source`].
    pub async fn search(&self, query: &str) -> Result<Vec<BookResult>, BookIdError> {
        Ok(self.search_detailed(query).await?.results)
    }

    /// Like [`search`](Self::search), also returning the classification
    pub async fn search_detailed(&self, query: &str) -> Result<SearchOutcome, BookIdError> {
        if query.trim().is_empty() {
            return Err(BookIdError::invalid("query cannot be empty"));
        }

        let classified = classify(query);

        let records = tokio::time::timeout(self.timeout, self.source.search(&classified.query))
            .await
            .map_err(|_| BookIdError::Timeout(self.timeout))??;

        tracing::info!(
            source = self.source.id(),
            mode = classified.mode.id(),
            candidates = records.len(),
            "Search complete"
        );

        let results = records
            .iter()
            .map(|record| project(record, classified.mode, classified.isbn.as_deref()))
            .collect();

        Ok(SearchOutcome {
            classified,
            results,
        })
    }
}
