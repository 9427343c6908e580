//! Finn-Harvest: a polite listing snapshot harvester
//!
//! This crate fetches real-estate listing pages and their images, keeps each
//! listing as an immutable snapshot in a directory-per-identifier cache, and
//! extracts structured fields from the cached snapshots.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod listing;
pub mod storage;
pub mod tree;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Enumeration error: {0}")]
    Enumerate(#[from] crawler::EnumerateError),

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOutcome, Harvester};
pub use extract::{FieldValue, ListingRecord};
pub use listing::ListingId;
pub use storage::{CacheStatus, DocumentStore};
