//! Testing utilities and mock implementations.
//!
//! Mocks for the two external collaborators of the resolver, so the whole
//! pipeline can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use archivestream_core::testing::{fixtures, MockContentStore, MockMetadataLookup};
//!
//! let metadata = MockMetadataLookup::new();
//! metadata.set_metadata("tt000", "Show", Some("2001")).await;
//!
//! let store = MockContentStore::new();
//! store.set_files("showarc", fixtures::season_files("Show", 1, 3)).await;
//! ```

mod mock_content_store;
mod mock_metadata;

pub use mock_content_store::MockContentStore;
pub use mock_metadata::MockMetadataLookup;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::media::ContainerFile;

    const MB: u64 = 1024 * 1024;

    /// A video file with a plausible size.
    pub fn video_file(name: &str) -> ContainerFile {
        ContainerFile::new(name, Some(350 * MB))
    }

    /// `<show>.S<ss>E<ee>.mkv` for episodes 1..=count, with sizes that
    /// shrink as the episode number grows.
    pub fn season_files(show: &str, season: u32, count: u32) -> Vec<ContainerFile> {
        (1..=count)
            .map(|episode| {
                ContainerFile::new(
                    format!("{}.S{:02}E{:02}.mkv", show, season, episode),
                    Some((400 - episode as u64) * MB),
                )
            })
            .collect()
    }

    /// The non-video files every archive item carries.
    pub fn item_extras(identifier: &str) -> Vec<ContainerFile> {
        vec![
            ContainerFile::new(format!("{}_meta.xml", identifier), Some(1_200)),
            ContainerFile::new(format!("{}_files.xml", identifier), Some(3_400)),
            ContainerFile::new("__ia_thumb.jpg", Some(9_000)),
        ]
    }
}
