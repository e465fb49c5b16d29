//! Collaborator seams for the search engine.
//!
//! `SearchService` and `GeolocationProvider` are the engine's only two
//! external dependencies. Both return futures, allowing the caller to
//! spawn or await them however it wants, and both are mockable for
//! testing.

use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

use stoop_core::{Coordinates, GeoError, Listing, SearchError, SearchQuery};

/// Response of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Trait for the remote marketplace search API.
pub trait SearchService: Send + Sync {
    /// Run a search with the given query.
    fn search(&self, query: SearchQuery)
        -> BoxFuture<'static, Result<SearchResults, SearchError>>;

    /// Persist the given term as a saved search for the current user.
    fn save_search(&self, term: String) -> BoxFuture<'static, Result<(), SearchError>>;
}

/// Trait for single-shot device positioning.
///
/// One call, one position. Continuous tracking is out of scope.
pub trait GeolocationProvider: Send + Sync {
    fn current_position(&self) -> BoxFuture<'static, Result<Coordinates, GeoError>>;
}

// =============================================================================
// HTTP Search Service
// =============================================================================

/// Real search service backed by the marketplace HTTP API.
pub struct HttpSearchService {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSearchService {
    /// Create a service for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    /// Create with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    /// The configured server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SearchService for HttpSearchService {
    fn search(
        &self,
        query: SearchQuery,
    ) -> BoxFuture<'static, Result<SearchResults, SearchError>> {
        let url = format!("{}/api/search", self.base_url);
        let request = self.client.get(url.as_str()).query(&query.to_pairs());
        let timeout = self.timeout;

        Box::pin(async move {
            tracing::debug!("GET {}", url);
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout { duration: timeout }
                } else {
                    SearchError::Request(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(SearchError::Status {
                    status: status.as_u16(),
                });
            }

            response
                .json::<SearchResults>()
                .await
                .map_err(|e| SearchError::Decode(e.to_string()))
        })
    }

    fn save_search(&self, term: String) -> BoxFuture<'static, Result<(), SearchError>> {
        let url = format!("{}/api/searches", self.base_url);
        let request = self
            .client
            .post(url.as_str())
            .json(&serde_json::json!({ "query": term }));
        let timeout = self.timeout;

        Box::pin(async move {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout { duration: timeout }
                } else {
                    SearchError::Request(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(SearchError::Status {
                    status: status.as_u16(),
                });
            }
            Ok(())
        })
    }
}

// =============================================================================
// Mock Collaborators for Testing
// =============================================================================
