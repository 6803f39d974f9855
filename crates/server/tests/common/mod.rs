//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing of the addon
//! endpoints without network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use archivestream_core::{
    testing::{MockContentStore, MockMetadataLookup},
    Config, Resolver, ResolverConfig,
};
use archivestream_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use archivestream_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Metadata lookup (MockMetadataLookup)
/// - Content store search and listings (MockContentStore)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_stream_lookup() {
///     let fixture = TestFixture::new();
///     fixture.metadata.set_metadata("tt000", "Show", Some("2001")).await;
///
///     let response = fixture.get("/stream/series/tt000:1:5.json").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock metadata lookup - configure titles and years
    pub metadata: Arc<MockMetadataLookup>,
    /// Mock content store - configure search results and file listings
    pub store: Arc<MockContentStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture with a custom config.
    pub fn with_config(config: Config) -> Self {
        let metadata = Arc::new(MockMetadataLookup::new());
        let store = Arc::new(MockContentStore::new());

        let resolver = Arc::new(Resolver::new(
            ResolverConfig::from(&config),
            metadata.clone(),
            store.clone(),
        ));
        let state = Arc::new(AppState::new(config, resolver));
        let router = create_router(state);

        Self {
            router,
            metadata,
            store,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}
