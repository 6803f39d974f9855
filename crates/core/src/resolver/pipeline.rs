//! The resolver: wires lookup, search, expansion, filtering and ranking.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{Config, FilterConfig};
use crate::media::{CanonicalMetadata, MediaKind, MediaRequest, Stream, StreamCandidate};
use crate::metadata::{MetadataError, MetadataLookup};
use crate::metrics;
use crate::store::ContentStore;

use super::candidates::{expand_containers, gather_candidates};
use super::episode::EpisodeMatcher;
use super::filter::FileFilter;
use super::rank::{rank_files, MatchedFile, StreamAssembler};
use super::strategy::build_queries;
use super::ResolveError;

/// Immutable settings for the resolver, fixed at construction.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub filter: FilterConfig,
    /// Rows requested per search strategy.
    pub rows: u32,
    /// Timeout for each external call.
    pub call_timeout: Duration,
    /// Containers expanded per request.
    pub max_containers: usize,
    /// Base of every stream URL.
    pub download_url: String,
    /// Label on every emitted stream.
    pub display_name: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ResolverConfig {
    fn from(config: &Config) -> Self {
        Self {
            filter: config.filter.clone(),
            rows: config.archive.rows,
            call_timeout: Duration::from_secs(config.archive.timeout_secs as u64),
            max_containers: config.archive.max_containers,
            download_url: config.archive.download_url.clone(),
            display_name: config.addon.display_name.clone(),
        }
    }
}

/// Pipeline stage reached by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolveStage {
    Start,
    MetadataResolved,
    CandidatesGathered,
    FilesExpanded,
    Filtered,
    Ranked,
    Done,
}

impl fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolveStage::Start => "start",
            ResolveStage::MetadataResolved => "metadata_resolved",
            ResolveStage::CandidatesGathered => "candidates_gathered",
            ResolveStage::FilesExpanded => "files_expanded",
            ResolveStage::Filtered => "filtered",
            ResolveStage::Ranked => "ranked",
            ResolveStage::Done => "done",
        };
        f.write_str(s)
    }
}

/// Full outcome of one resolution, for callers that want more than streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub streams: Vec<StreamCandidate>,
    /// Last stage completed before reaching `Done`.
    pub last_stage: ResolveStage,
    pub metadata: Option<CanonicalMetadata>,
    /// Every non-fatal condition met along the way.
    pub errors: Vec<ResolveError>,
}

/// Per-request progress through the stages.
struct Progress<'a> {
    request: &'a MediaRequest,
    stage: ResolveStage,
    metadata: Option<CanonicalMetadata>,
    errors: Vec<ResolveError>,
}

impl<'a> Progress<'a> {
    fn new(request: &'a MediaRequest) -> Self {
        Self {
            request,
            stage: ResolveStage::Start,
            metadata: None,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self, stage: ResolveStage) {
        debug!(
            id = self.request.external_id(),
            from = %self.stage,
            to = %stage,
            "Resolve stage"
        );
        self.stage = stage;
    }

    fn finish(self, streams: Vec<StreamCandidate>) -> Resolution {
        debug!(
            id = self.request.external_id(),
            from = %self.stage,
            to = %ResolveStage::Done,
            "Resolve stage"
        );
        Resolution {
            streams,
            last_stage: self.stage,
            metadata: self.metadata,
            errors: self.errors,
        }
    }

    fn finish_empty(mut self, reason: ResolveError) -> Resolution {
        debug!(id = self.request.external_id(), reason = %reason, "Resolution ended early");
        self.errors.push(reason);
        self.finish(Vec::new())
    }
}

/// Resolves media requests into ranked streams.
///
/// Stateless between calls; share it behind an `Arc`.
pub struct Resolver {
    config: ResolverConfig,
    metadata: Arc<dyn MetadataLookup>,
    store: Arc<dyn ContentStore>,
    filter: FileFilter,
    matcher: EpisodeMatcher,
    assembler: StreamAssembler,
}

impl Resolver {
    pub fn new(
        config: ResolverConfig,
        metadata: Arc<dyn MetadataLookup>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let filter = FileFilter::new(&config.filter);
        let assembler = StreamAssembler::new(&config.download_url, &config.display_name);
        Self {
            config,
            metadata,
            store,
            filter,
            matcher: EpisodeMatcher::new(),
            assembler,
        }
    }

    /// Replace the default episode patterns.
    pub fn with_matcher(mut self, matcher: EpisodeMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a request into stream descriptors. Never fails; problems
    /// along the way only shrink the result.
    pub async fn resolve(&self, request: &MediaRequest) -> Vec<Stream> {
        self.resolve_detailed(request)
            .await
            .streams
            .into_iter()
            .map(Stream::from)
            .collect()
    }

    /// Resolve a request, keeping stage and error details.
    pub async fn resolve_detailed(&self, request: &MediaRequest) -> Resolution {
        let start = Instant::now();
        let resolution = self.run(request).await;

        let outcome = if resolution.streams.is_empty() {
            "empty"
        } else {
            "streams"
        };
        metrics::RESOLUTIONS.with_label_values(&[outcome]).inc();
        metrics::RESOLUTION_DURATION
            .with_label_values(&[request.kind().as_str()])
            .observe(start.elapsed().as_secs_f64());
        metrics::STREAMS_EMITTED
            .with_label_values(&[])
            .observe(resolution.streams.len() as f64);

        info!(
            id = request.external_id(),
            kind = %request.kind(),
            streams = resolution.streams.len(),
            stage = %resolution.last_stage,
            degraded = resolution.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolution complete"
        );

        resolution
    }

    async fn run(&self, request: &MediaRequest) -> Resolution {
        let mut progress = Progress::new(request);

        // Metadata
        let lookup = timeout(self.config.call_timeout, self.metadata.lookup(request))
            .await
            .unwrap_or_else(|_| Err(MetadataError::Timeout));
        match lookup {
            Ok(meta) => progress.metadata = Some(meta),
            Err(e) => {
                warn!(
                    id = request.external_id(),
                    provider = self.metadata.name(),
                    error = %e,
                    "Metadata lookup failed, searching by id only"
                );
                metrics::EXTERNAL_FAILURES
                    .with_label_values(&["metadata"])
                    .inc();
                progress
                    .errors
                    .push(ResolveError::MetadataUnavailable(e.to_string()));
            }
        }
        progress.advance(ResolveStage::MetadataResolved);

        // Candidates
        let queries = build_queries(request, progress.metadata.as_ref(), self.config.rows);
        let (candidates, errors) =
            gather_candidates(self.store.as_ref(), &queries, self.config.call_timeout).await;
        progress.errors.extend(errors);
        metrics::CANDIDATES_FOUND
            .with_label_values(&[])
            .observe(candidates.len() as f64);
        if candidates.is_empty() {
            return progress.finish_empty(ResolveError::NoCandidates);
        }
        debug!(
            id = request.external_id(),
            strategies = queries.len(),
            candidates = candidates.len(),
            "Candidates gathered"
        );
        progress.advance(ResolveStage::CandidatesGathered);

        // Expansion
        let (containers, errors) = expand_containers(
            self.store.as_ref(),
            &candidates,
            self.config.max_containers,
            self.config.call_timeout,
        )
        .await;
        progress.errors.extend(errors);
        progress.advance(ResolveStage::FilesExpanded);

        // Filtering and episode matching
        let matched: Vec<MatchedFile> = containers
            .into_iter()
            .flat_map(|c| {
                let identifier = c.identifier;
                c.files.into_iter().map(move |file| MatchedFile {
                    identifier: identifier.clone(),
                    file,
                })
            })
            .filter(|m| self.keep(request, m))
            .collect();
        if matched.is_empty() {
            return progress.finish_empty(ResolveError::NoMatchingFiles);
        }
        progress.advance(ResolveStage::Filtered);

        // Ranking
        let ranked = rank_files(matched);
        progress.advance(ResolveStage::Ranked);

        let streams = self.assembler.assemble_all(&ranked);
        progress.finish(streams)
    }

    fn keep(&self, request: &MediaRequest, matched: &MatchedFile) -> bool {
        if let Err(rejection) = self.filter.check(&matched.file) {
            debug!(file = %matched.file.name, ?rejection, "File filtered out");
            return false;
        }

        match (request.kind(), request.target_episode()) {
            (MediaKind::Series, Some(target)) => {
                match self.matcher.matching_pattern(&matched.file.name, target) {
                    Some(pattern) => {
                        debug!(file = %matched.file.name, pattern, "Episode matched");
                        true
                    }
                    None => false,
                }
            }
            _ => true,
        }
    }
}
