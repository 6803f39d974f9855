//! Candidate gathering and container expansion.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::media::ContainerFile;
use crate::metrics;
use crate::store::{ContentStore, SearchQuery, StoreError};

use super::ResolveError;

/// Deduplicated container identifiers, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier. Returns false if it was already present.
    pub fn insert(&mut self, identifier: String) -> bool {
        if self.seen.contains(&identifier) {
            return false;
        }
        self.seen.insert(identifier.clone());
        self.order.push(identifier);
        true
    }

    /// Merge identifiers from another strategy.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, identifiers: I) {
        for id in identifiers {
            self.insert(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.seen.contains(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Files listed for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedContainer {
    pub identifier: String,
    pub files: Vec<ContainerFile>,
}

/// Run every query concurrently and union the identifiers.
///
/// A failed or timed-out strategy contributes nothing; its error is
/// returned alongside the set.
pub async fn gather_candidates(
    store: &dyn ContentStore,
    queries: &[SearchQuery],
    call_timeout: Duration,
) -> (CandidateSet, Vec<ResolveError>) {
    let searches = queries.iter().map(|query| async move {
        let result = match timeout(call_timeout, store.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        };
        (query, result)
    });

    let mut candidates = CandidateSet::new();
    let mut errors = Vec::new();

    for (query, result) in join_all(searches).await {
        match result {
            Ok(identifiers) => {
                debug!(
                    strategy = %query.strategy,
                    results = identifiers.len(),
                    "Strategy returned identifiers"
                );
                candidates.extend(identifiers);
            }
            Err(e) => {
                warn!(strategy = %query.strategy, error = %e, "Search strategy failed");
                metrics::EXTERNAL_FAILURES.with_label_values(&["search"]).inc();
                errors.push(ResolveError::SearchUnavailable {
                    strategy: query.strategy,
                    reason: e.to_string(),
                });
            }
        }
    }

    (candidates, errors)
}

/// List the first `max_containers` candidates concurrently.
///
/// Containers whose listing fails come back with no files.
pub async fn expand_containers(
    store: &dyn ContentStore,
    candidates: &CandidateSet,
    max_containers: usize,
    call_timeout: Duration,
) -> (Vec<ExpandedContainer>, Vec<ResolveError>) {
    if candidates.len() > max_containers {
        debug!(
            candidates = candidates.len(),
            max_containers, "Capping container expansion"
        );
    }

    let listings = candidates.iter().take(max_containers).map(|id| async move {
        let result = match timeout(call_timeout, store.list_files(id)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        };
        (id, result)
    });

    let mut containers = Vec::new();
    let mut errors = Vec::new();

    for (identifier, result) in join_all(listings).await {
        let files = match result {
            Ok(files) => files,
            Err(e) => {
                warn!(identifier, error = %e, "Container listing failed");
                metrics::EXTERNAL_FAILURES
                    .with_label_values(&["container"])
                    .inc();
                errors.push(ResolveError::ContainerUnavailable {
                    identifier: identifier.to_string(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };
        containers.push(ExpandedContainer {
            identifier: identifier.to_string(),
            files,
        });
    }

    (containers, errors)
}
