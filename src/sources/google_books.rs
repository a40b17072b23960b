//! Google Books source implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

use crate::config::GoogleBooksConfig;
use crate::models::{CandidateRecord, VolumesResponse};
use crate::sources::{Source, SourceError};
use crate::utils::HttpClient;

/// Google Books source
///
/// Uses the public `volumes` endpoint of the Google Books API. Works without
/// an API key, at a much lower daily quota.
#[derive(Debug, Clone)]
pub struct GoogleBooksSource {
    client: Arc<HttpClient>,
    base_url: url::Url,
    api_key: Option<String>,
    max_results: u32,
}

impl GoogleBooksSource {
    /// Create a source from configuration
    pub fn new(config: &GoogleBooksConfig) -> Result<Self, SourceError> {
        Self::with_client(Arc::new(HttpClient::new()?), config)
    }

    /// Create a source sharing an existing HTTP client
    pub fn with_client(
        client: Arc<HttpClient>,
        config: &GoogleBooksConfig,
    ) -> Result<Self, SourceError> {
        let base = config.base_url.trim_end_matches('/');
        let base_url = url::Url::parse(&format!("{}/volumes", base)).map_err(|e| {
            SourceError::InvalidRequest(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            max_results: config.max_results,
        })
    }

    /// Build the volumes search URL for a rewritten query
    fn build_url(&self, query: &str) -> url::Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("maxResults", &self.max_results.to_string());
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

#[async_trait]
impl Source for GoogleBooksSource {
    fn id(&self) -> &str {
        "google_books"
    }

    fn name(&self) -> &str {
        "Google Books"
    }

    async fn search(&self, query: &str) -> Result<Vec<CandidateRecord>, SourceError> {
        let url = self.build_url(query);
        tracing::debug!(query, authenticated = self.api_key.is_some(), "Searching Google Books");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search Google Books: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::RateLimit(format!(
                "Google Books API returned status {}: {}",
                status,
                body.trim()
            )));
        }
        if !status.is_success() {
            return Err(SourceError::Api(format!(
                "Google Books API returned status: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;
        let data: VolumesResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        tracing::debug!(
            total_items = data.total_items.unwrap_or(0),
            returned = data.items.len(),
            "Google Books response"
        );

        Ok(data.items)
    }
}
