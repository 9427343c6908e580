//! Storage module for cached listing snapshots
//!
//! Each listing lives in its own directory under `<data-dir>/cache/<id>/`:
//! - `index.html` holds the raw listing document, byte-for-byte
//! - `0.jpg`, `1.jpg`, ... hold the listing's images in discovery order
//!
//! A directory without `index.html` marks a fetch that was attempted but
//! never completed.

mod document_store;
mod error;

pub use document_store::DocumentStore;
pub use error::{StorageError, StorageResult};

/// Name of the cache directory under the data root
pub const CACHE_DIR: &str = "cache";

/// File name of the raw listing document within an entry
pub const DOCUMENT_FILE: &str = "index.html";

/// Extension of stored image assets
pub const ASSET_EXTENSION: &str = "jpg";

/// State of one identifier in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No directory exists for the identifier
    Absent,

    /// The directory exists but holds no document
    Stale,

    /// A document has been stored
    Present,
}

impl CacheStatus {
    /// Returns true if a document has been stored
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}
