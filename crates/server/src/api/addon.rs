//! Addon protocol endpoints: manifest and stream lookup.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use archivestream_core::{MediaKind, MediaRequest, Stream};

use crate::state::AppState;

/// Addon manifest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub types: Vec<String>,
    pub resources: Vec<String>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
}

/// Response body of the stream endpoint.
#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<Stream>,
}

impl StreamsResponse {
    fn empty() -> Self {
        Self {
            streams: Vec::new(),
        }
    }
}

pub async fn manifest(State(state): State<Arc<AppState>>) -> Json<Manifest> {
    let addon = &state.config().addon;
    Json(Manifest {
        id: addon.id.clone(),
        version: addon.version.clone(),
        name: addon.name.clone(),
        description: addon.description.clone(),
        types: [MediaKind::Movie, MediaKind::Series]
            .iter()
            .map(|k| k.as_str().to_string())
            .collect(),
        resources: vec!["stream".to_string()],
        id_prefixes: vec!["tt".to_string()],
        catalogs: Vec::new(),
    })
}

/// `GET /stream/{kind}/{id}.json`.
///
/// Requests that cannot be parsed get an empty stream list, never an error.
pub async fn streams(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<StreamsResponse> {
    let id = id.strip_suffix(".json").unwrap_or(id.as_str());

    let request = match MediaRequest::parse(&kind, id) {
        Ok(request) => request,
        Err(e) => {
            debug!(kind = %kind, id = %id, error = %e, "Ignoring unparseable stream request");
            return Json(StreamsResponse::empty());
        }
    };

    let streams = state.resolver().resolve(&request).await;
    Json(StreamsResponse { streams })
}
