//! Content store abstraction.
//!
//! This module provides a `ContentStore` trait for keyword search and
//! container listings against a public archive (Internet Archive, etc.).

mod internet_archive;
mod types;

pub use internet_archive::InternetArchiveStore;
pub use types::*;
