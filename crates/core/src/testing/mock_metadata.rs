//! Mock metadata lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::{CanonicalMetadata, MediaRequest};
use crate::metadata::{MetadataError, MetadataLookup};

/// Mock implementation of the MetadataLookup trait.
///
/// Ids without configured metadata return `NotFound`.
#[derive(Debug, Default)]
pub struct MockMetadataLookup {
    entries: Arc<RwLock<HashMap<String, CanonicalMetadata>>>,
    /// If set, the next lookup fails with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
    lookups: Arc<RwLock<Vec<String>>>,
}

impl MockMetadataLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical title and optional year for an external id.
    pub async fn set_metadata(&self, external_id: &str, title: &str, year: Option<&str>) {
        self.entries.write().await.insert(
            external_id.to_string(),
            CanonicalMetadata {
                title: title.to_string(),
                year: year.map(String::from),
            },
        );
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// External ids looked up so far.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl MetadataLookup for MockMetadataLookup {
    fn name(&self) -> &str {
        "mock"
    }

    async fn lookup(&self, request: &MediaRequest) -> Result<CanonicalMetadata, MetadataError> {
        let id = request.external_id();
        self.lookups.write().await.push(id.to_string());

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_metadata_lookup() {
        let lookup = MockMetadataLookup::new();
        lookup.set_metadata("tt1", "Show", Some("2001")).await;

        let meta = lookup.lookup(&MediaRequest::movie("tt1")).await.unwrap();
        assert_eq!(meta.title, "Show");
        assert_eq!(meta.year.as_deref(), Some("2001"));

        assert!(matches!(
            lookup.lookup(&MediaRequest::movie("tt2")).await,
            Err(MetadataError::NotFound(_))
        ));
        assert_eq!(lookup.lookup_count().await, 2);
    }

    #[tokio::test]
    async fn test_mock_metadata_next_error_is_one_shot() {
        let lookup = MockMetadataLookup::new();
        lookup.set_metadata("tt1", "Show", None).await;
        lookup.set_next_error(MetadataError::Timeout).await;

        assert!(lookup.lookup(&MediaRequest::movie("tt1")).await.is_err());
        assert!(lookup.lookup(&MediaRequest::movie("tt1")).await.is_ok());
    }
}
