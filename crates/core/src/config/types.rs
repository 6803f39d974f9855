use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub addon: AddonConfig,
    /// Metadata provider. Resolution degrades to external-id search without it.
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    7000
}

/// Addon identity as advertised in the manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    #[serde(default = "default_addon_id")]
    pub id: String,
    #[serde(default = "default_addon_name")]
    pub name: String,
    #[serde(default = "default_addon_description")]
    pub description: String,
    /// Manifest version (default: the package version).
    #[serde(default = "default_addon_version")]
    pub version: String,
    /// Label shown next to every stream.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            name: default_addon_name(),
            description: default_addon_description(),
            version: default_addon_version(),
            display_name: default_display_name(),
        }
    }
}

fn default_addon_id() -> String {
    "org.archivestream.internet-archive".to_string()
}

fn default_addon_name() -> String {
    "Internet Archive".to_string()
}

fn default_addon_description() -> String {
    "Streams public domain movies and series from the Internet Archive".to_string()
}

fn default_addon_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_display_name() -> String {
    "Internet Archive".to_string()
}

/// TMDB metadata lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3)
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 5)
    #[serde(default = "default_tmdb_timeout")]
    pub timeout_secs: u32,
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_timeout() -> u32 {
    5
}

/// Internet Archive content store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Advanced search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Item metadata endpoint (file listings)
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
    /// Base path that stream URLs are composed from
    #[serde(default = "default_download_url")]
    pub download_url: String,
    /// Result rows requested per search strategy
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Per-call timeout in seconds
    #[serde(default = "default_archive_timeout")]
    pub timeout_secs: u32,
    /// Maximum number of deduplicated containers expanded per request
    #[serde(default = "default_max_containers")]
    pub max_containers: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            metadata_url: default_metadata_url(),
            download_url: default_download_url(),
            rows: default_rows(),
            timeout_secs: default_archive_timeout(),
            max_containers: default_max_containers(),
        }
    }
}

fn default_search_url() -> String {
    "https://archive.org/advancedsearch.php".to_string()
}

fn default_metadata_url() -> String {
    "https://archive.org/metadata".to_string()
}

fn default_download_url() -> String {
    "https://archive.org/download".to_string()
}

fn default_rows() -> u32 {
    50
}

fn default_archive_timeout() -> u32 {
    8
}

fn default_max_containers() -> usize {
    10
}

/// File filtering applied to every container listing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Allowed video extensions, without the dot
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    /// Filenames containing any of these (case-insensitive) are dropped
    #[serde(default = "default_negative_keywords")]
    pub negative_keywords: Vec<String>,
    /// Files smaller than this are dropped. Zero disables the check.
    #[serde(default)]
    pub min_size_bytes: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            negative_keywords: default_negative_keywords(),
            min_size_bytes: 0,
        }
    }
}

fn default_video_extensions() -> Vec<String> {
    ["mkv", "mp4", "avi", "mov", "m4v", "webm", "ogv", "mpeg", "mpg"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_negative_keywords() -> Vec<String> {
    [
        "trailer",
        "sample",
        "screener",
        "promo",
        "teaser",
        "preview",
        "extras",
        "featurette",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub addon: AddonConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
    pub archive: ArchiveConfig,
    pub filter: FilterConfig,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            addon: config.addon.clone(),
            tmdb: config.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                base_url: t.base_url.clone(),
                api_key_configured: !t.api_key.is_empty(),
                timeout_secs: t.timeout_secs,
            }),
            archive: config.archive.clone(),
            filter: config.filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.tmdb.is_none());
        assert_eq!(config.archive.max_containers, 10);
        assert_eq!(config.archive.timeout_secs, 8);
        assert_eq!(config.filter.min_size_bytes, 0);
        assert!(config.filter.video_extensions.contains(&"mkv".to_string()));
        assert!(config.filter.negative_keywords.contains(&"trailer".to_string()));
    }

    #[test]
    fn test_addon_version_defaults_to_package_version() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.addon.version, env!("CARGO_PKG_VERSION"));

        let config: Config = toml::from_str("[addon]\nversion = \"2.0.0\"").unwrap();
        assert_eq!(config.addon.version, "2.0.0");
        assert_eq!(config.addon.name, "Internet Archive");
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_tmdb_with_defaults() {
        let toml = r#"
[tmdb]
api_key = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let tmdb = config.tmdb.unwrap();
        assert_eq!(tmdb.api_key, "secret");
        assert_eq!(tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(tmdb.timeout_secs, 5);
    }

    #[test]
    fn test_deserialize_tmdb_missing_key_fails() {
        let toml = r#"
[tmdb]
base_url = "http://localhost"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_filter_overrides() {
        let toml = r#"
[filter]
video_extensions = ["mkv"]
negative_keywords = ["cam"]
min_size_bytes = 1048576
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.filter.video_extensions, vec!["mkv"]);
        assert_eq!(config.filter.negative_keywords, vec!["cam"]);
        assert_eq!(config.filter.min_size_bytes, 1_048_576);
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            tmdb: Some(TmdbConfig {
                api_key: "secret-key".to_string(),
                base_url: default_tmdb_url(),
                timeout_secs: 5,
            }),
            ..Default::default()
        };

        let sanitized = SanitizedConfig::from(&config);
        let tmdb = sanitized.tmdb.as_ref().unwrap();
        assert!(tmdb.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_sanitized_config_without_tmdb() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(sanitized.tmdb.is_none());
        assert_eq!(sanitized.server.port, 7000);
    }
}
