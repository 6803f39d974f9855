//! Mock content store for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::media::ContainerFile;
use crate::store::{ContentStore, SearchQuery, StoreError};

/// Mock implementation of the ContentStore trait.
///
/// Search results are keyed by exact query text; unknown queries return no
/// identifiers and unknown containers have no files.
///
/// # Example
///
/// ```rust,ignore
/// use archivestream_core::testing::MockContentStore;
///
/// let store = MockContentStore::new();
/// store.set_search_results("title:(Show) AND year:(2001)", vec!["showarc"]).await;
/// store.set_files("showarc", vec![ContainerFile::new("Show.S01E05.mkv", Some(900))]).await;
/// ```
#[derive(Debug, Default)]
pub struct MockContentStore {
    /// Identifiers returned per query text.
    results: Arc<RwLock<HashMap<String, Vec<String>>>>,
    /// Query texts that fail.
    failing_searches: Arc<RwLock<HashSet<String>>>,
    /// Artificial latency per query text.
    search_delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Files per container identifier.
    files: Arc<RwLock<HashMap<String, Vec<ContainerFile>>>>,
    /// Container identifiers whose listing fails.
    failing_listings: Arc<RwLock<HashSet<String>>>,
    /// Searches received, in call order.
    searches: Arc<RwLock<Vec<SearchQuery>>>,
    /// Listings received, in call order.
    listings: Arc<RwLock<Vec<String>>>,
}

impl MockContentStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Identifiers to return for an exact query text.
    pub async fn set_search_results(&self, query: &str, identifiers: Vec<&str>) {
        self.results.write().await.insert(
            query.to_string(),
            identifiers.into_iter().map(String::from).collect(),
        );
    }

    /// Make a query fail with an API error.
    pub async fn fail_search(&self, query: &str) {
        self.failing_searches
            .write()
            .await
            .insert(query.to_string());
    }

    /// Delay the answer to a query.
    pub async fn set_search_delay(&self, query: &str, delay: Duration) {
        self.search_delays
            .write()
            .await
            .insert(query.to_string(), delay);
    }

    /// Files to list for a container.
    pub async fn set_files(&self, identifier: &str, files: Vec<ContainerFile>) {
        self.files
            .write()
            .await
            .insert(identifier.to_string(), files);
    }

    /// Make a container listing fail with an API error.
    pub async fn fail_listing(&self, identifier: &str) {
        self.failing_listings
            .write()
            .await
            .insert(identifier.to_string());
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// All searches received so far.
    pub async fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.read().await.clone()
    }

    /// Number of searches received.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Identifiers whose files were requested, in call order.
    pub async fn listed_identifiers(&self) -> Vec<String> {
        self.listings.read().await.clone()
    }

    /// Forget recorded calls, keeping configuration.
    pub async fn clear_recorded(&self) {
        self.searches.write().await.clear();
        self.listings.write().await.clear();
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, StoreError> {
        self.searches.write().await.push(query.clone());

        let delay = self.search_delays.read().await.get(&query.query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_searches.read().await.contains(&query.query) {
            return Err(StoreError::ApiError(format!(
                "simulated failure for {}",
                query.query
            )));
        }

        let results = self
            .results
            .read()
            .await
            .get(&query.query)
            .cloned()
            .unwrap_or_default();
        Ok(results.into_iter().take(query.rows as usize).collect())
    }

    async fn list_files(&self, identifier: &str) -> Result<Vec<ContainerFile>, StoreError> {
        self.listings.write().await.push(identifier.to_string());

        if self.failing_listings.read().await.contains(identifier) {
            return Err(StoreError::ApiError(format!(
                "simulated failure for {}",
                identifier
            )));
        }

        Ok(self
            .files
            .read()
            .await
            .get(identifier)
            .cloned()
            .unwrap_or_default())
    }
}
