//! arXiv query API integration.
//!
//! [`build_query`] and [`parse`] are the pure core: query construction and
//! feed parsing, both free of I/O and shared state. [`ArxivClient`] is the
//! fetch collaborator that glues them to the HTTP endpoint.

pub mod feed;
pub mod query;

pub use feed::{normalize_whitespace, parse, ParsedFeed};
pub use query::build_query;

use std::sync::Arc;

use crate::config::ArxivConfig;
use crate::models::{SearchRequest, SearchResponse};
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Errors that can occur when building queries, parsing feeds, or fetching
#[derive(Debug, thiserror::Error)]
pub enum ArxivError {
    /// Malformed search request; the caller must fix the input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Feed body does not match the expected Atom schema at all
    #[error("Parse error: {0}")]
    Parse(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Error response from the arXiv API
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for ArxivError {
    fn from(err: reqwest::Error) -> Self {
        ArxivError::Network(err.to_string())
    }
}

/// Client for the arXiv query API
///
/// Owns the only blocking operation (the HTTP fetch); retries of transient
/// failures live here, never in the core functions.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Arc<HttpClient>,
    config: ArxivConfig,
}

impl ArxivClient {
    /// Create a new client for the given configuration
    pub fn new(config: ArxivConfig) -> Self {
        let client = Arc::new(HttpClient::new(&config));
        Self { client, config }
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, config: ArxivConfig) -> Self {
        Self { client, config }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ArxivConfig {
        &self.config
    }

    /// Execute a search: build the query, fetch the feed, parse the result
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ArxivError> {
        let built = build_query(request, &self.config)?;
        let url = format!("{}?{}", self.config.api_url, built.query_string);

        tracing::debug!(query = %built.search_query, %url, "searching arXiv");

        let client = Arc::clone(&self.client);
        let url_for_retry = url.clone();

        let body = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url_for_retry.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/atom+xml")
                    .send()
                    .await
                    .map_err(|e| {
                        ArxivError::Network(format!("failed to fetch arXiv results: {}", e))
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ArxivError::Api(format!(
                        "arXiv API returned status {}",
                        status
                    )));
                }

                response
                    .text()
                    .await
                    .map_err(|e| ArxivError::Network(format!("failed to read response: {}", e)))
            }
        })
        .await?;

        let parsed = parse(&body)?;

        tracing::info!(
            count = parsed.papers.len(),
            total = parsed.meta.total_results,
            "search complete"
        );

        Ok(SearchResponse {
            papers: parsed.papers,
            meta: parsed.meta,
            query: built.search_query,
            max_results: built.max_results,
        })
    }
}
