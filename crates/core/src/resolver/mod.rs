//! Resolution pipeline: canonical request to ranked stream descriptors.
//!
//! Stages run strictly in order and any of them may end the request early
//! with an empty result:
//!
//! `Start → MetadataResolved → CandidatesGathered → FilesExpanded → Filtered → Ranked → Done`

mod candidates;
mod episode;
mod filter;
mod pipeline;
mod rank;
mod strategy;

pub use candidates::{expand_containers, gather_candidates, CandidateSet, ExpandedContainer};
pub use episode::{CanonicalPattern, CompactPattern, EpisodeMatcher, EpisodePattern, SpelledPattern};
pub use filter::{FileFilter, Rejection};
pub use pipeline::{Resolution, ResolveStage, Resolver, ResolverConfig};
pub use rank::{rank_files, MatchedFile, StreamAssembler};
pub use strategy::build_queries;

use thiserror::Error;

use crate::store::StrategyKind;

/// Conditions met while resolving. None of them is fatal: they are logged
/// and collapse into fewer (or no) streams.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Search strategy {strategy} unavailable: {reason}")]
    SearchUnavailable {
        strategy: StrategyKind,
        reason: String,
    },

    #[error("Container {identifier} unavailable: {reason}")]
    ContainerUnavailable { identifier: String, reason: String },

    #[error("No candidate containers found")]
    NoCandidates,

    #[error("No files matched the request")]
    NoMatchingFiles,
}
