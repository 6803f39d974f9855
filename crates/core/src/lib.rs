//! Resolve movie and episode requests into direct Internet Archive streams.

pub mod config;
pub mod media;
pub mod metadata;
pub mod metrics;
pub mod resolver;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use media::{
    CanonicalMetadata, ContainerFile, Episode, MediaKind, MediaRequest, RequestError, Stream,
    StreamCandidate,
};
pub use metadata::{MetadataError, MetadataLookup, NoMetadata, TmdbMetadata};
pub use resolver::{Resolution, ResolveError, ResolveStage, Resolver, ResolverConfig};
pub use store::{ContentStore, InternetArchiveStore, SearchQuery, StoreError, StrategyKind};
