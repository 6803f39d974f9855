//! Prometheus metrics for the resolution pipeline.
//!
//! This module provides metrics for:
//! - Resolutions (outcome, duration, streams emitted)
//! - Candidate gathering
//! - External services (metadata, search, container listings)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Resolution Metrics
// =============================================================================

/// Resolutions total by outcome.
pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("archivestream_resolutions_total", "Total stream resolutions"),
        &["outcome"], // "streams", "empty"
    )
    .unwrap()
});

/// Resolution duration in seconds.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "archivestream_resolution_duration_seconds",
            "Duration of a full resolution",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        &["kind"], // "movie", "series"
    )
    .unwrap()
});

/// Streams emitted per resolution.
pub static STREAMS_EMITTED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "archivestream_streams_emitted",
            "Number of streams returned per resolution",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
        &[],
    )
    .unwrap()
});

/// Deduplicated candidates per resolution.
pub static CANDIDATES_FOUND: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "archivestream_candidates_found",
            "Number of deduplicated containers found per resolution",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// Failed external calls by kind.
pub static EXTERNAL_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "archivestream_external_failures_total",
            "External calls that failed or timed out",
        ),
        &["kind"], // "metadata", "search", "container"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RESOLUTIONS.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
        Box::new(STREAMS_EMITTED.clone()),
        Box::new(CANDIDATES_FOUND.clone()),
        Box::new(EXTERNAL_FAILURES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        RESOLUTIONS.with_label_values(&["empty"]).inc();
        EXTERNAL_FAILURES.with_label_values(&["search"]).inc();

        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"archivestream_resolutions_total".to_string()));
        assert!(names.contains(&"archivestream_external_failures_total".to_string()));
    }
}
