//! Configuration module for Finn-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use finn_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Cache root: {}", config.storage.data_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EnumerateConfig, ExtractConfig, FetchConfig, FieldEntry, FieldKind, MissingPolicy,
    StorageConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
