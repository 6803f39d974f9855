//! Ranking and stream assembly.

use std::cmp::Ordering;

use crate::media::{ContainerFile, StreamCandidate};

/// A file that survived filtering, tied to its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFile {
    pub identifier: String,
    pub file: ContainerFile,
}

/// Largest known size first; unknown sizes last; ties by filename.
fn rank_order(a: &MatchedFile, b: &MatchedFile) -> Ordering {
    match (a.file.size_bytes, b.file.size_bytes) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.file.name.cmp(&b.file.name))
    .then_with(|| a.identifier.cmp(&b.identifier))
}

/// Sort matched files by rank.
pub fn rank_files(mut files: Vec<MatchedFile>) -> Vec<MatchedFile> {
    files.sort_by(rank_order);
    files
}

/// Turns ranked files into stream candidates.
#[derive(Debug, Clone)]
pub struct StreamAssembler {
    download_url: String,
    display_name: String,
}

impl StreamAssembler {
    pub fn new(download_url: &str, display_name: &str) -> Self {
        Self {
            download_url: download_url.trim_end_matches('/').to_string(),
            display_name: display_name.to_string(),
        }
    }

    /// `<download_url>/<identifier>/<file path>`, each segment percent-encoded.
    pub fn file_url(&self, identifier: &str, file_name: &str) -> String {
        let path = file_name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}",
            self.download_url,
            urlencoding::encode(identifier),
            path
        )
    }

    pub fn assemble(&self, matched: &MatchedFile) -> StreamCandidate {
        let mut title = display_title(&matched.file.name);
        if let Some(size) = matched.file.size_bytes {
            title.push_str(&format!(" ({})", format_size(size)));
        }
        StreamCandidate {
            display_name: self.display_name.clone(),
            title,
            url: self.file_url(&matched.identifier, &matched.file.name),
            size_bytes: matched.file.size_bytes,
        }
    }

    pub fn assemble_all(&self, ranked: &[MatchedFile]) -> Vec<StreamCandidate> {
        ranked.iter().map(|m| self.assemble(m)).collect()
    }
}

/// Filename without directories or extension, with `.`/`_` turned into spaces.
fn display_title(file_name: &str) -> String {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    stem.replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for u in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = u;
    }
    format!("{:.1} {}", value, unit)
}
