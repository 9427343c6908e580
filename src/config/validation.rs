use crate::config::types::{Config, EnumerateConfig, ExtractConfig, FetchConfig, StorageConfig};
use crate::extract::CATEGORY_FIELD;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Longest politeness delay accepted, in milliseconds
const MAX_DELAY_CEILING_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_fetch_config(&config.fetch)?;
    validate_enumerate_config(&config.enumerate)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if !config.listing_url.contains("{id}") {
        return Err(ConfigError::Validation(format!(
            "listing-url must contain an {{id}} placeholder, got '{}'",
            config.listing_url
        )));
    }

    validate_http_url("listing-url", &config.listing_url.replace("{id}", "1"))?;

    if config.max_delay_ms > MAX_DELAY_CEILING_MS {
        return Err(ConfigError::Validation(format!(
            "max-delay-ms must be <= {}, got {}",
            MAX_DELAY_CEILING_MS, config.max_delay_ms
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_enumerate_config(config: &EnumerateConfig) -> Result<(), ConfigError> {
    validate_http_url("endpoint", &config.endpoint)?;

    if config.min_x >= config.max_x || config.min_y >= config.max_y {
        return Err(ConfigError::Validation(format!(
            "bounding box is empty: ({}, {}) .. ({}, {})",
            config.min_x, config.min_y, config.max_x, config.max_y
        )));
    }

    if config.width == 0 || config.height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-empty, got {}x{}",
            config.width, config.height
        )));
    }

    if config.search_key.is_empty() {
        return Err(ConfigError::Validation(
            "search-key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    let mut seen: HashSet<&str> = HashSet::from([CATEGORY_FIELD]);

    for entry in &config.fields {
        if entry.field.trim().is_empty() {
            return Err(ConfigError::Validation(
                "extract field name cannot be empty".to_string(),
            ));
        }

        if entry.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "extract field '{}' has an empty label",
                entry.field
            )));
        }

        if !seen.insert(entry.field.as_str()) {
            return Err(ConfigError::Validation(format!(
                "extract field '{}' is defined more than once",
                entry.field
            )));
        }
    }

    Ok(())
}

/// Validates that a value is an absolute HTTP(S) URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            name, value
        )));
    }

    Ok(())
}
