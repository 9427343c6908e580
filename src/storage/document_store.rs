//! Directory-per-identifier document store
//!
//! The store only ever has one writer per identifier, so it needs no locking.
//! Documents are written to a temporary file and renamed into place, so a
//! reader sees either the previous document or the new one in full.

use crate::listing::ListingId;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::{CacheStatus, ASSET_EXTENSION, CACHE_DIR, DOCUMENT_FILE};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error};

/// Suffix appended to a document while it is being written
const TEMP_SUFFIX: &str = ".tmp";

/// Filesystem-backed cache of listing documents and assets
#[derive(Debug, Clone)]
pub struct DocumentStore {
    cache_root: PathBuf,
}

impl DocumentStore {
    /// Creates a store rooted at `<data_dir>/cache`
    ///
    /// Nothing is created on disk until an entry is first written.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_root: data_dir.as_ref().join(CACHE_DIR),
        }
    }

    /// Returns the cache root directory
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Returns the directory holding one listing
    pub fn entry_dir(&self, id: ListingId) -> PathBuf {
        self.cache_root.join(id.to_string())
    }

    /// Returns the path of a listing's raw document
    pub fn document_path(&self, id: ListingId) -> PathBuf {
        self.entry_dir(id).join(DOCUMENT_FILE)
    }

    /// Returns the path of a listing's `index`-th asset
    pub fn asset_path(&self, id: ListingId, index: usize) -> PathBuf {
        self.entry_dir(id).join(format!("{}.{}", index, ASSET_EXTENSION))
    }

    /// Reports whether a listing is cached
    ///
    /// # Returns
    ///
    /// * `Absent` - no directory exists
    /// * `Stale` - the directory exists without a document
    /// * `Present` - a document is stored
    /// * `Err(StorageError::NotADirectory)` - the entry path is a plain file
    pub async fn status(&self, id: ListingId) -> StorageResult<CacheStatus> {
        let dir = self.entry_dir(id);
        match fs::metadata(&dir).await {
            Ok(meta) if !meta.is_dir() => return Err(StorageError::NotADirectory(dir)),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheStatus::Absent),
            Err(e) => return Err(io_error(&dir, e)),
        }

        let document = self.document_path(id);
        match fs::metadata(&document).await {
            Ok(meta) if meta.is_file() => Ok(CacheStatus::Present),
            Ok(_) => Ok(CacheStatus::Stale),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CacheStatus::Stale),
            Err(e) => Err(io_error(&document, e)),
        }
    }

    /// Creates the directory for a listing if it does not exist
    pub async fn ensure_dir(&self, id: ListingId) -> StorageResult<()> {
        let dir = self.entry_dir(id);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::NotADirectory(dir)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&dir)
                    .await
                    .map_err(|e| io_error(&dir, e))?;
                debug!("Created cache entry: {}", dir.display());
                Ok(())
            }
            Err(e) => Err(io_error(&dir, e)),
        }
    }

    /// Stores the raw document for a listing, replacing any previous one
    pub async fn write_document(&self, id: ListingId, bytes: &[u8]) -> StorageResult<()> {
        let final_path = self.document_path(id);
        let temp_path = self
            .entry_dir(id)
            .join(format!("{}{}", DOCUMENT_FILE, TEMP_SUFFIX));

        fs::write(&temp_path, bytes)
            .await
            .map_err(|e| io_error(&temp_path, e))?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            error!("Failed to move document into place: {}", e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(&final_path, e));
        }

        debug!("Stored {} bytes at {}", bytes.len(), final_path.display());
        Ok(())
    }

    /// Reads the raw document for a listing
    ///
    /// Fails with `StorageError::NotFound` if no document has been stored.
    pub async fn read_document(&self, id: ListingId) -> StorageResult<Vec<u8>> {
        let path = self.document_path(id);
        fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound(id)
            } else {
                io_error(&path, e)
            }
        })
    }

    /// Stores the `index`-th asset of a listing
    pub async fn write_asset(
        &self,
        id: ListingId,
        index: usize,
        bytes: &[u8],
    ) -> StorageResult<()> {
        let path = self.asset_path(id, index);
        fs::write(&path, bytes).await.map_err(|e| io_error(&path, e))
    }

    /// Lists every identifier that has a cache directory, in ascending order
    ///
    /// A missing cache root means nothing has been cached yet. Plain files in
    /// the cache root are ignored; a directory whose name is not an identifier
    /// is an error.
    pub async fn list_cached_identifiers(&self) -> StorageResult<Vec<ListingId>> {
        let mut entries = match fs::read_dir(&self.cache_root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.cache_root, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.cache_root, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error(&entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let id = name
                .parse::<ListingId>()
                .map_err(|_| StorageError::InvalidEntry(name.clone()))?;
            ids.push(id);
        }

        ids.sort_unstable();
        Ok(ids)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}
