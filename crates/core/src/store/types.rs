//! Types for the content store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::media::ContainerFile;

/// Search strategy, in fixed priority order (most specific first).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Title, year and (for series) the `SxxEyy` token.
    Specific,
    /// Title and year.
    Broad,
    /// Title alone.
    TitleOnly,
    /// The external id as a search token.
    ExternalId,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Specific => "specific",
            StrategyKind::Broad => "broad",
            StrategyKind::TitleOnly => "title-only",
            StrategyKind::ExternalId => "external-id",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query ready to run against the store's search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    /// Which strategy produced this query.
    pub strategy: StrategyKind,
    /// Store-specific query text.
    pub query: String,
    /// Maximum rows to return.
    pub rows: u32,
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Content store connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Content store API error: {0}")]
    ApiError(String),

    #[error("Failed to parse content store response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            StoreError::ParseError(e.to_string())
        } else {
            StoreError::ApiError(e.to_string())
        }
    }
}

/// Trait for keyword-searchable content stores.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run a search, returning matching container identifiers in store order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, StoreError>;

    /// List the files of one container.
    async fn list_files(&self, identifier: &str) -> Result<Vec<ContainerFile>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_priority_order() {
        let mut kinds = vec![
            StrategyKind::ExternalId,
            StrategyKind::TitleOnly,
            StrategyKind::Specific,
            StrategyKind::Broad,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::Specific,
                StrategyKind::Broad,
                StrategyKind::TitleOnly,
                StrategyKind::ExternalId,
            ]
        );
    }

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(
            serde_json::to_string(&StrategyKind::TitleOnly).unwrap(),
            "\"title-only\""
        );
        assert_eq!(StrategyKind::ExternalId.to_string(), "external-id");
    }
}
