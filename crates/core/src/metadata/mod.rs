//! Metadata lookup: external title id to canonical title and year.
//!
//! The provider is an unreliable collaborator. Callers treat every error
//! as "no metadata" and fall back to searching by the external id.

mod tmdb;

pub use tmdb::TmdbMetadata;

use async_trait::async_trait;
use thiserror::Error;

use crate::media::{CanonicalMetadata, MediaRequest};

/// Errors that can occur when looking up metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// No title matches the external id.
    #[error("No metadata found for {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Lookup did not answer in time.
    #[error("Metadata lookup timed out")]
    Timeout,

    /// Lookup not configured (missing API key, etc.).
    #[error("Metadata lookup not configured: {0}")]
    NotConfigured(String),
}

/// Maps an external title id to canonical metadata.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Look up the canonical title/year for a request.
    async fn lookup(&self, request: &MediaRequest) -> Result<CanonicalMetadata, MetadataError>;
}

/// Lookup used when no provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetadata;

#[async_trait]
impl MetadataLookup for NoMetadata {
    fn name(&self) -> &str {
        "none"
    }

    async fn lookup(&self, _request: &MediaRequest) -> Result<CanonicalMetadata, MetadataError> {
        Err(MetadataError::NotConfigured(
            "no metadata provider configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_metadata_is_not_configured() {
        let lookup = NoMetadata;
        let result = lookup.lookup(&MediaRequest::movie("tt1")).await;
        assert!(matches!(result, Err(MetadataError::NotConfigured(_))));
    }
}
