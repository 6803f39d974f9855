//! TMDB (The Movie Database) metadata lookup.
//!
//! Resolves IMDb ids through TMDB's `/find` endpoint, which returns
//! matching movies and TV series in separate lists.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{MetadataError, MetadataLookup};
use crate::config::TmdbConfig;
use crate::media::{CanonicalMetadata, MediaKind, MediaRequest};

/// TMDB-backed [`MetadataLookup`].
pub struct TmdbMetadata {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbMetadata {
    /// Create a new TMDB lookup.
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn find_url(&self, external_id: &str) -> String {
        format!(
            "{}/find/{}",
            self.base_url,
            urlencoding::encode(external_id)
        )
    }
}

#[async_trait]
impl MetadataLookup for TmdbMetadata {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn lookup(&self, request: &MediaRequest) -> Result<CanonicalMetadata, MetadataError> {
        let url = self.find_url(request.external_id());

        debug!(id = request.external_id(), kind = %request.kind(), "TMDB find");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("external_source", "imdb_id"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(MetadataError::NotFound(request.external_id().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body: TmdbFindResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse find response: {}", e))
        })?;

        body.into_metadata(request.kind())
            .ok_or_else(|| MetadataError::NotFound(request.external_id().to_string()))
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbMovieResult>,
    #[serde(default)]
    tv_results: Vec<TmdbTvResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    title: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvResult {
    name: String,
    first_air_date: Option<String>,
}

impl TmdbFindResponse {
    fn into_metadata(self, kind: MediaKind) -> Option<CanonicalMetadata> {
        match kind {
            MediaKind::Movie => self.movie_results.into_iter().find_map(|m| {
                CanonicalMetadata::from_title_and_date(&m.title, m.release_date.as_deref())
            }),
            MediaKind::Series => self.tv_results.into_iter().find_map(|t| {
                CanonicalMetadata::from_title_and_date(&t.name, t.first_air_date.as_deref())
            }),
        }
    }
}
