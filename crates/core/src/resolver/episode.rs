//! Filename-based episode identification.
//!
//! Each naming convention is an independent [`EpisodePattern`]. A file
//! belongs to the requested episode if any pattern accepts it.

use regex_lite::Regex;

use crate::media::Episode;

/// One filename convention for encoding season and episode.
pub trait EpisodePattern: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Whether the filename encodes the target episode.
    fn matches(&self, filename: &str, target: Episode) -> bool;
}

/// Scan every match of `re` and compare captured season/episode numbers.
///
/// Patterns leave the episode's trailing boundary unconsumed so that the
/// separator before an adjacent token stays available to the next match;
/// the boundary is checked here instead.
fn any_capture_matches(re: &Regex, filename: &str, target: Episode) -> bool {
    re.captures_iter(filename).any(|caps| {
        let (Some(season), Some(episode)) = (caps.get(1), caps.get(2)) else {
            return false;
        };
        if filename[episode.end()..].starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        season.as_str().parse::<u32>().ok() == Some(target.season)
            && episode.as_str().parse::<u32>().ok() == Some(target.episode)
    })
}

/// `S01E05`, `s01.e05`, `S01_E05`, `S01-E05`, `S01 E05`.
pub struct CanonicalPattern {
    re: Regex,
}

impl CanonicalPattern {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)s(\d{1,3})[._\- ]?e(\d{1,4})")
                .expect("canonical episode pattern is valid"),
        }
    }
}

impl Default for CanonicalPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodePattern for CanonicalPattern {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn matches(&self, filename: &str, target: Episode) -> bool {
        any_capture_matches(&self.re, filename, target)
    }
}

/// `1x05`, `1X5`, `01x05`.
///
/// Both numbers must be bounded by non-digits so resolutions like
/// `1920x1080` never match.
pub struct CompactPattern {
    re: Regex,
}

impl CompactPattern {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?:^|\D)(\d{1,2})[xX](\d{1,4})")
                .expect("compact episode pattern is valid"),
        }
    }
}

impl Default for CompactPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodePattern for CompactPattern {
    fn name(&self) -> &'static str {
        "compact"
    }

    fn matches(&self, filename: &str, target: Episode) -> bool {
        any_capture_matches(&self.re, filename, target)
    }
}

/// `Season 1 Episode 5`, `season.01.episode.05`, `Season_1-Episode_5`.
pub struct SpelledPattern {
    re: Regex,
}

impl SpelledPattern {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)season[^a-z0-9]*(\d{1,3})[^a-z0-9]*episode[^a-z0-9]*(\d{1,4})")
                .expect("spelled episode pattern is valid"),
        }
    }
}

impl Default for SpelledPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodePattern for SpelledPattern {
    fn name(&self) -> &'static str {
        "spelled"
    }

    fn matches(&self, filename: &str, target: Episode) -> bool {
        any_capture_matches(&self.re, filename, target)
    }
}

/// Ordered set of patterns combined with logical OR.
pub struct EpisodeMatcher {
    patterns: Vec<Box<dyn EpisodePattern>>,
}

impl EpisodeMatcher {
    /// Matcher with the standard canonical, compact and spelled-out patterns.
    pub fn new() -> Self {
        Self::with_patterns(vec![
            Box::new(CanonicalPattern::new()),
            Box::new(CompactPattern::new()),
            Box::new(SpelledPattern::new()),
        ])
    }

    pub fn with_patterns(patterns: Vec<Box<dyn EpisodePattern>>) -> Self {
        Self { patterns }
    }

    /// Name of the first pattern accepting the filename, if any.
    pub fn matching_pattern(&self, filename: &str, target: Episode) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|p| p.matches(filename, target))
            .map(|p| p.name())
    }

    pub fn matches(&self, filename: &str, target: Episode) -> bool {
        self.matching_pattern(filename, target).is_some()
    }
}

impl Default for EpisodeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EpisodeMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeMatcher")
            .field(
                "patterns",
                &self.patterns.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1E5: Episode = Episode {
        season: 1,
        episode: 5,
    };

    #[test]
    fn test_matcher_accepts_known_conventions() {
        let m = EpisodeMatcher::new();
        assert!(m.matches("Show.Name.S01E05.mkv", S1E5));
        assert!(m.matches("Show.Name.1x05.mkv", S1E5));
        assert!(m.matches("Show Name Season 1 Episode 5.mkv", S1E5));
    }

    #[test]
    fn test_matcher_rejects_other_episode_and_junk() {
        let m = EpisodeMatcher::new();
        assert!(!m.matches("Show.Name.S01E06.mkv", S1E5));
        assert!(!m.matches("Show.Name.Trailer.mkv", S1E5));
    }

    #[test]
    fn test_canonical_separators_and_case() {
        let p = CanonicalPattern::new();
        for name in [
            "show.s01e05.mkv",
            "Show.S01.E05.mkv",
            "Show_S01_E05.mkv",
            "Show-S01-E05.mkv",
            "Show S01 E05.mkv",
            "Show.S1E5.mkv",
            "Show.S01E05E06.mkv",
        ] {
            assert!(p.matches(name, S1E5), "{} should match", name);
        }
        assert!(!p.matches("Show.S01E050.mkv", S1E5));
        assert!(!p.matches("Show.S11E05.mkv", S1E5));
        assert!(!p.matches("Show.S01E15.mkv", S1E5));
    }

    #[test]
    fn test_canonical_scans_past_first_token() {
        let p = CanonicalPattern::new();
        assert!(p.matches("Series 1 Show S01E05.mkv", S1E5));
        assert!(p.matches("s02e01 recap then S01E05.mkv", S1E5));
    }

    #[test]
    fn test_compact_padding_and_bounds() {
        let p = CompactPattern::new();
        assert!(p.matches("Show 1x5.avi", S1E5));
        assert!(p.matches("Show 1X05.avi", S1E5));
        assert!(p.matches("01x05 - Pilot.avi", S1E5));
        assert!(!p.matches("Show 1x50.avi", S1E5));
        assert!(!p.matches("Show 11x05.avi", S1E5));
        assert!(!p.matches("Show 1920x1080.avi", S1E5));
    }

    #[test]
    fn test_spelled_flexible_separators() {
        let p = SpelledPattern::new();
        assert!(p.matches("show season 1 episode 5.mp4", S1E5));
        assert!(p.matches("Show.Season.01.Episode.05.mp4", S1E5));
        assert!(p.matches("Show_SEASON_1-EPISODE_5.mp4", S1E5));
        assert!(p.matches("Show Season 1, Episode 5.mp4", S1E5));
        assert!(!p.matches("Show Season 1 Episode 15.mp4", S1E5));
        assert!(!p.matches("Show Season 10 Episode 5.mp4", S1E5));
    }

    #[test]
    fn test_adjacent_tokens_each_considered() {
        let m = EpisodeMatcher::new();
        for name in [
            "Show.1x04-1x05.mkv",
            "Show.1x04.1x05.mkv",
            "Show 1x04_1x05.avi",
            "Show - 1x04 - 1x05.avi",
            "Show.S01E04.S01E05.mkv",
            "Show.S01E04-S01E05.mkv",
            "Show Season 1 Episode 4 Season 1 Episode 5.mkv",
        ] {
            assert!(m.matches(name, S1E5), "{} should match", name);
        }
        assert!(CompactPattern::new().matches("Show.1x04-1x05.mkv", S1E5));
        assert!(CanonicalPattern::new().matches("Show.S01E04.S01E05.mkv", S1E5));
        assert!(SpelledPattern::new().matches("Season 1 Episode 4.Season 1 Episode 5.mkv", S1E5));
        assert!(!m.matches("Show.1x04-1x06.mkv", S1E5));
    }

    #[test]
    fn test_large_numbers_compare_by_value() {
        let m = EpisodeMatcher::new();
        let target = Episode {
            season: 12,
            episode: 103,
        };
        assert!(m.matches("Show.S12E103.mkv", target));
        assert!(m.matches("Show 12x103.mkv", target));
    }

    #[test]
    fn test_matching_pattern_reports_name() {
        let m = EpisodeMatcher::new();
        assert_eq!(m.matching_pattern("a.1x05.mkv", S1E5), Some("compact"));
        assert_eq!(m.matching_pattern("a.mkv", S1E5), None);
    }

    #[test]
    fn test_custom_pattern_set() {
        struct Never;
        impl EpisodePattern for Never {
            fn name(&self) -> &'static str {
                "never"
            }
            fn matches(&self, _filename: &str, _target: Episode) -> bool {
                false
            }
        }

        let m = EpisodeMatcher::with_patterns(vec![Box::new(Never)]);
        assert!(!m.matches("Show.S01E05.mkv", S1E5));
    }
}
