//! Extension, junk-keyword and size filtering of container files.

use crate::config::FilterConfig;
use crate::media::ContainerFile;

/// Why a file was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotVideo,
    Keyword(String),
    TooSmall { size: u64, min: u64 },
}

/// Filter applied to every container file before episode matching.
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// Lowercase suffixes including the dot (".mkv").
    suffixes: Vec<String>,
    keywords: Vec<String>,
    min_size_bytes: u64,
}

impl FileFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let suffixes = config
            .video_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e))
            .collect();

        let keywords = config
            .negative_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            suffixes,
            keywords,
            min_size_bytes: config.min_size_bytes,
        }
    }

    /// Check a file, reporting the first rule it fails.
    pub fn check(&self, file: &ContainerFile) -> Result<(), Rejection> {
        let name = file.name.to_lowercase();

        if !self.suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            return Err(Rejection::NotVideo);
        }

        if let Some(keyword) = self.keywords.iter().find(|k| name.contains(k.as_str())) {
            return Err(Rejection::Keyword(keyword.clone()));
        }

        // Unknown sizes never reject; a zero threshold disables the rule.
        if self.min_size_bytes > 0 {
            if let Some(size) = file.size_bytes.filter(|s| *s > 0) {
                if size < self.min_size_bytes {
                    return Err(Rejection::TooSmall {
                        size,
                        min: self.min_size_bytes,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn accepts(&self, file: &ContainerFile) -> bool {
        self.check(file).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(min_size_bytes: u64) -> FileFilter {
        FileFilter::new(&FilterConfig {
            min_size_bytes,
            ..Default::default()
        })
    }

    fn file(name: &str, size: Option<u64>) -> ContainerFile {
        ContainerFile::new(name, size)
    }

    #[test]
    fn test_negative_keyword_rejects_trailer() {
        let f = filter(0);
        assert_eq!(
            f.check(&file("Movie.Trailer.mp4", Some(100))),
            Err(Rejection::Keyword("trailer".to_string()))
        );
        assert!(f.accepts(&file("Movie.mp4", Some(100))));
    }

    #[test]
    fn test_extension_allowlist_is_case_insensitive() {
        let f = filter(0);
        assert!(f.accepts(&file("Movie.MKV", None)));
        assert!(f.accepts(&file("dir/Movie.Mp4", None)));
        assert_eq!(f.check(&file("Movie.srt", None)), Err(Rejection::NotVideo));
        assert_eq!(f.check(&file("Movie_meta.xml", None)), Err(Rejection::NotVideo));
        assert_eq!(f.check(&file("mkv", None)), Err(Rejection::NotVideo));
    }

    #[test]
    fn test_keyword_match_is_substring() {
        let f = filter(0);
        assert!(!f.accepts(&file("Show.S01E05.SAMPLE.mkv", None)));
        assert!(!f.accepts(&file("movie-screener-copy.avi", None)));
    }

    #[test]
    fn test_min_size_rejects_known_small_files() {
        let f = filter(1000);
        assert_eq!(
            f.check(&file("Movie.mp4", Some(999))),
            Err(Rejection::TooSmall {
                size: 999,
                min: 1000
            })
        );
        assert!(f.accepts(&file("Movie.mp4", Some(1000))));
    }

    #[test]
    fn test_min_size_ignores_unknown_sizes() {
        let f = filter(1000);
        assert!(f.accepts(&file("Movie.mp4", None)));
        assert!(f.accepts(&ContainerFile {
            name: "Movie.mp4".to_string(),
            size_bytes: Some(0),
        }));
    }

    #[test]
    fn test_zero_threshold_disables_size_filter() {
        let f = filter(0);
        assert!(f.accepts(&file("Movie.mp4", Some(1))));
    }

    #[test]
    fn test_custom_extensions_normalised() {
        let f = FileFilter::new(&FilterConfig {
            video_extensions: vec![".MKV".to_string(), " webm ".to_string()],
            negative_keywords: vec![],
            min_size_bytes: 0,
        });
        assert!(f.accepts(&file("a.mkv", None)));
        assert!(f.accepts(&file("a.webm", None)));
        assert!(!f.accepts(&file("a.mp4", None)));
        assert!(f.accepts(&file("Movie.Trailer.mkv", None)));
    }
}
