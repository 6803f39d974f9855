//! Request and result types shared across the resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of title being requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "series" => Ok(MediaKind::Series),
            other => Err(RequestError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Season/episode pair for series requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
}

impl Episode {
    /// Canonical `S01E05` token.
    pub fn token(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }
}

/// Errors raised when building a [`MediaRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unsupported media type: {0}")]
    UnsupportedKind(String),

    #[error("Malformed id: {0}")]
    MalformedId(String),

    #[error("Series requests need both season and episode")]
    MissingEpisode,

    #[error("Movie requests cannot carry season or episode")]
    UnexpectedEpisode,
}

/// A canonical stream request.
///
/// Season and episode are present exactly when the kind is [`MediaKind::Series`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRequest {
    kind: MediaKind,
    external_id: String,
    episode: Option<Episode>,
}

impl MediaRequest {
    pub fn movie(external_id: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Movie,
            external_id: external_id.into(),
            episode: None,
        }
    }

    pub fn episode(external_id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            kind: MediaKind::Series,
            external_id: external_id.into(),
            episode: Some(Episode { season, episode }),
        }
    }

    /// Build a request from loose parts, enforcing the kind/episode invariant.
    pub fn new(
        kind: MediaKind,
        external_id: impl Into<String>,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<Self, RequestError> {
        let external_id = external_id.into();
        if external_id.trim().is_empty() {
            return Err(RequestError::MalformedId(external_id));
        }
        match (kind, season, episode) {
            (MediaKind::Movie, None, None) => Ok(Self::movie(external_id)),
            (MediaKind::Movie, _, _) => Err(RequestError::UnexpectedEpisode),
            (MediaKind::Series, Some(s), Some(e)) => Ok(Self::episode(external_id, s, e)),
            (MediaKind::Series, _, _) => Err(RequestError::MissingEpisode),
        }
    }

    /// Parse the addon id syntax: `tt0000001` for movies and
    /// `tt0000001:1:5` for a series episode.
    pub fn parse(kind: &str, id: &str) -> Result<Self, RequestError> {
        let kind: MediaKind = kind.parse()?;
        let mut parts = id.split(':');
        let external_id = parts.next().unwrap_or_default();
        let season = parts.next().map(parse_number).transpose()?;
        let episode = parts.next().map(parse_number).transpose()?;
        if parts.next().is_some() {
            return Err(RequestError::MalformedId(id.to_string()));
        }
        Self::new(kind, external_id, season, episode)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn target_episode(&self) -> Option<Episode> {
        self.episode
    }

    pub fn season(&self) -> Option<u32> {
        self.episode.map(|e| e.season)
    }

    pub fn episode_number(&self) -> Option<u32> {
        self.episode.map(|e| e.episode)
    }
}

fn parse_number(s: &str) -> Result<u32, RequestError> {
    s.parse::<u32>()
        .map_err(|_| RequestError::MalformedId(s.to_string()))
}

/// Normalized title and year from the metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMetadata {
    pub title: String,
    /// Four-digit year, when known.
    pub year: Option<String>,
}

impl CanonicalMetadata {
    /// Build metadata from a title and a date-like string (`2001-09-15`, `2001`).
    ///
    /// Returns `None` for a blank title.
    pub fn from_title_and_date(title: &str, date: Option<&str>) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            year: date.and_then(extract_year),
        })
    }
}

fn extract_year(date: &str) -> Option<String> {
    let year: String = date.trim().chars().take(4).collect();
    (year.len() == 4 && year.chars().all(|c| c.is_ascii_digit())).then_some(year)
}

/// A file inside a content-store container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerFile {
    pub name: String,
    /// Size in bytes; `None` when missing, zero, or unparsable.
    pub size_bytes: Option<u64>,
}

impl ContainerFile {
    pub fn new(name: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            name: name.into(),
            size_bytes: size_bytes.filter(|s| *s > 0),
        }
    }
}

/// A ranked, playable file (internal; carries size for ranking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCandidate {
    pub display_name: String,
    pub title: String,
    pub url: String,
    pub size_bytes: Option<u64>,
}

/// Stream descriptor handed to the addon surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub name: String,
    pub title: String,
    pub url: String,
}

impl From<StreamCandidate> for Stream {
    fn from(c: StreamCandidate) -> Self {
        Self {
            name: c.display_name,
            title: c.title,
            url: c.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_id() {
        let request = MediaRequest::parse("movie", "tt0032138").unwrap();
        assert_eq!(request.kind(), MediaKind::Movie);
        assert_eq!(request.external_id(), "tt0032138");
        assert!(request.target_episode().is_none());
    }

    #[test]
    fn test_parse_series_id() {
        let request = MediaRequest::parse("series", "tt0000001:2:13").unwrap();
        assert_eq!(request.kind(), MediaKind::Series);
        assert_eq!(request.external_id(), "tt0000001");
        assert_eq!(request.season(), Some(2));
        assert_eq!(request.episode_number(), Some(13));
    }

    #[test]
    fn test_parse_rejects_series_without_episode() {
        assert_eq!(
            MediaRequest::parse("series", "tt0000001"),
            Err(RequestError::MissingEpisode)
        );
        assert_eq!(
            MediaRequest::parse("series", "tt0000001:1"),
            Err(RequestError::MissingEpisode)
        );
    }

    #[test]
    fn test_parse_rejects_movie_with_episode() {
        assert_eq!(
            MediaRequest::parse("movie", "tt0000001:1:2"),
            Err(RequestError::UnexpectedEpisode)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            MediaRequest::parse("channel", "tt1"),
            Err(RequestError::UnsupportedKind(_))
        ));
        assert!(matches!(
            MediaRequest::parse("series", "tt1:one:2"),
            Err(RequestError::MalformedId(_))
        ));
        assert!(matches!(
            MediaRequest::parse("series", "tt1:1:2:3"),
            Err(RequestError::MalformedId(_))
        ));
        assert!(matches!(
            MediaRequest::parse("movie", ""),
            Err(RequestError::MalformedId(_))
        ));
    }

    #[test]
    fn test_episode_token_is_zero_padded() {
        let ep = Episode {
            season: 1,
            episode: 5,
        };
        assert_eq!(ep.token(), "S01E05");
        let ep = Episode {
            season: 12,
            episode: 103,
        };
        assert_eq!(ep.token(), "S12E103");
    }

    #[test]
    fn test_metadata_year_extraction() {
        let meta = CanonicalMetadata::from_title_and_date("Show", Some("2001-09-15")).unwrap();
        assert_eq!(meta.year.as_deref(), Some("2001"));

        let meta = CanonicalMetadata::from_title_and_date("Show", Some("")).unwrap();
        assert!(meta.year.is_none());

        let meta = CanonicalMetadata::from_title_and_date("Show", Some("n/a")).unwrap();
        assert!(meta.year.is_none());

        assert!(CanonicalMetadata::from_title_and_date("  ", Some("2001")).is_none());
    }

    #[test]
    fn test_container_file_zero_size_is_unknown() {
        assert_eq!(ContainerFile::new("a.mkv", Some(0)).size_bytes, None);
        assert_eq!(ContainerFile::new("a.mkv", Some(10)).size_bytes, Some(10));
    }

    #[test]
    fn test_stream_serialization_drops_size() {
        let candidate = StreamCandidate {
            display_name: "Internet Archive".to_string(),
            title: "Movie".to_string(),
            url: "https://archive.org/download/x/Movie.mp4".to_string(),
            size_bytes: Some(42),
        };
        let json = serde_json::to_value(Stream::from(candidate)).unwrap();
        assert_eq!(json["name"], "Internet Archive");
        assert!(json.get("size_bytes").is_none());
    }
}
