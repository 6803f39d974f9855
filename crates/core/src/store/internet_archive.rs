//! Internet Archive content store implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ArchiveConfig;
use crate::media::ContainerFile;

use super::{ContentStore, SearchQuery, StoreError};

/// Internet Archive search and metadata client.
pub struct InternetArchiveStore {
    client: Client,
    search_url: String,
    metadata_url: String,
}

impl InternetArchiveStore {
    /// Create a new store client with the given configuration.
    pub fn new(config: &ArchiveConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            metadata_url: config.metadata_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the advanced search URL for a query.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?q={}&fl[]=identifier&rows={}&page=1&output=json",
            self.search_url,
            urlencoding::encode(&query.query),
            query.rows
        )
    }

    /// Build the item metadata URL for an identifier.
    fn build_metadata_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.metadata_url, urlencoding::encode(identifier))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, StoreError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl ContentStore for InternetArchiveStore {
    fn name(&self) -> &str {
        "internet_archive"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, StoreError> {
        let url = self.build_search_url(query);
        debug!(strategy = %query.strategy, query = %query.query, "Searching archive");

        let body: SearchResponse = self.get_json(&url).await?;
        let identifiers = body.identifiers();

        debug!(
            strategy = %query.strategy,
            results = identifiers.len(),
            "Archive search complete"
        );
        Ok(identifiers)
    }

    async fn list_files(&self, identifier: &str) -> Result<Vec<ContainerFile>, StoreError> {
        let url = self.build_metadata_url(identifier);
        debug!(identifier = identifier, "Listing archive item");

        let body: MetadataResponse = self.get_json(&url).await?;
        Ok(body.into_files())
    }
}

// Internet Archive API response types
#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchDocs,
}

#[derive(Debug, Deserialize)]
struct SearchDocs {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    identifier: Option<String>,
}

impl SearchResponse {
    fn identifiers(self) -> Vec<String> {
        self.response
            .docs
            .into_iter()
            .filter_map(|d| d.identifier)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Unknown identifiers come back as `{}`, so `files` is optional.
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    files: Vec<MetadataFile>,
}

#[derive(Debug, Deserialize)]
struct MetadataFile {
    name: Option<String>,
    /// Usually a decimal string, occasionally a number.
    #[serde(default)]
    size: Option<serde_json::Value>,
}

impl MetadataResponse {
    fn into_files(self) -> Vec<ContainerFile> {
        self.files
            .into_iter()
            .filter_map(|f| {
                let name = f.name?;
                Some(ContainerFile::new(name, f.size.as_ref().and_then(parse_size)))
            })
            .collect()
    }
}

fn parse_size(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
