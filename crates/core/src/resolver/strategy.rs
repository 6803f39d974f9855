//! Search strategy cascade.
//!
//! Strategies go from most to least specific. All of them run; their
//! identifiers are unioned, since downstream filtering rejects false positives.

use crate::media::{CanonicalMetadata, MediaRequest};
use crate::store::{SearchQuery, StrategyKind};

/// Builds the query text for one strategy, or `None` when the strategy
/// does not apply to this request.
type QueryBuilder = fn(&StrategyInput<'_>) -> Option<String>;

/// Everything a strategy may draw on.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    pub request: &'a MediaRequest,
    pub metadata: Option<&'a CanonicalMetadata>,
}

/// Ordered strategy table.
const STRATEGIES: &[(StrategyKind, QueryBuilder)] = &[
    (StrategyKind::Specific, specific_query),
    (StrategyKind::Broad, broad_query),
    (StrategyKind::TitleOnly, title_only_query),
    (StrategyKind::ExternalId, external_id_query),
];

/// Build the ordered list of queries for a request.
///
/// Without metadata only the external-id strategy is produced.
pub fn build_queries(
    request: &MediaRequest,
    metadata: Option<&CanonicalMetadata>,
    rows: u32,
) -> Vec<SearchQuery> {
    let input = StrategyInput { request, metadata };
    STRATEGIES
        .iter()
        .filter_map(|(strategy, build)| {
            build(&input).map(|query| SearchQuery {
                strategy: *strategy,
                query,
                rows,
            })
        })
        .collect()
}

const MEDIATYPE: &str = "mediatype:(movies)";

fn specific_query(input: &StrategyInput<'_>) -> Option<String> {
    let meta = input.metadata?;
    let episode = input.request.target_episode();
    // A movie with no year would just duplicate title-only.
    if episode.is_none() && meta.year.is_none() {
        return None;
    }

    let mut clauses = vec![format!("title:(\"{}\")", phrase(&meta.title)?)];
    if let Some(year) = &meta.year {
        clauses.push(format!("year:({})", year));
    }
    if let Some(ep) = episode {
        clauses.push(format!("(\"{}\")", ep.token()));
    }
    clauses.push(MEDIATYPE.to_string());
    Some(clauses.join(" AND "))
}

fn broad_query(input: &StrategyInput<'_>) -> Option<String> {
    let meta = input.metadata?;
    let year = meta.year.as_ref()?;
    Some(format!("title:({}) AND year:({})", terms(&meta.title)?, year))
}

fn title_only_query(input: &StrategyInput<'_>) -> Option<String> {
    let meta = input.metadata?;
    Some(format!("title:({}) AND {}", terms(&meta.title)?, MEDIATYPE))
}

fn external_id_query(input: &StrategyInput<'_>) -> Option<String> {
    let id = phrase(input.request.external_id())?;
    Some(format!("\"{}\" AND {}", id, MEDIATYPE))
}

/// Title text safe to place inside a quoted phrase.
fn phrase(text: &str) -> Option<String> {
    let cleaned = text.replace(['"', '\\'], "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Title reduced to bare search terms (no query syntax characters).
fn terms(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}
