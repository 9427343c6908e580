//! Listing fetcher
//!
//! This module handles all downloads of listing pages and images:
//! - Building the HTTP client with the configured user agent
//! - Consulting the cache so a listing is fetched at most once
//! - Persisting the page and discovering its images
//! - Downloading images in order when enabled
//! - Pausing after every completed fetch
//!
//! There are no retries: every failure ends the call.

use crate::config::FetchConfig;
use crate::crawler::images::discover_images;
use crate::crawler::throttle::Throttle;
use crate::listing::ListingId;
use crate::storage::{CacheStatus, DocumentStore, StorageError};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Which download of a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// The listing page itself
    Document,

    /// The `index`-th discovered image
    Image { index: usize },
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "document"),
            Self::Image { index } => write!(f, "image {}", index),
        }
    }
}

/// Errors that can occur while fetching a listing
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Error while downloading {stage} of listing {id} from {url}: {source}")]
    Http {
        id: ListingId,
        stage: FetchStage,
        url: String,
        source: reqwest::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FetchError {
    /// Returns the download stage that failed, if the failure was a download
    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            Self::Http { stage, .. } => Some(*stage),
            Self::Storage(_) => None,
        }
    }
}

/// What a fetch call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The listing was already cached; nothing was downloaded
    Cached,

    /// The listing page was downloaded and stored
    Fetched {
        /// Image URLs discovered in the page
        images_found: usize,
        /// Images downloaded and stored
        images_saved: usize,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads a URL, treating non-success statuses as failures
async fn get_bytes(client: &Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Downloads listings into the document store
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    store: DocumentStore,
    config: FetchConfig,
    throttle: Throttle,
}

impl Fetcher {
    pub fn new(client: Client, store: DocumentStore, config: FetchConfig) -> Self {
        let throttle = Throttle::new(Duration::from_millis(config.max_delay_ms));
        Self {
            client,
            store,
            config,
            throttle,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Fetches a listing unless it is already cached
    ///
    /// # Request Flow
    ///
    /// 1. Check the cache; a stored document ends the call unless `force` is set
    /// 2. Download the listing page and store it
    /// 3. Re-read the stored page and discover its image URLs
    /// 4. Download every image in order, if image downloads are enabled
    /// 5. Pause for a random delay
    ///
    /// # Returns
    ///
    /// * `Ok(FetchOutcome::Cached)` - Nothing was downloaded
    /// * `Ok(FetchOutcome::Fetched { .. })` - The page (and maybe images) were stored
    /// * `Err(FetchError)` - A download or cache operation failed
    pub async fn fetch(&self, id: ListingId, force: bool) -> Result<FetchOutcome, FetchError> {
        match self.store.status(id).await? {
            CacheStatus::Present if !force => {
                info!("Ignoring listing {} already in cache", id);
                return Ok(FetchOutcome::Cached);
            }
            CacheStatus::Absent => self.store.ensure_dir(id).await?,
            CacheStatus::Present | CacheStatus::Stale => {}
        }

        let url = self.config.listing_url_for(id);
        info!("Fetching listing {} from {}", id, url);

        let body = get_bytes(&self.client, &url)
            .await
            .map_err(|source| FetchError::Http {
                id,
                stage: FetchStage::Document,
                url: url.clone(),
                source,
            })?;
        self.store.write_document(id, &body).await?;

        let document = self.store.read_document(id).await?;
        let images = discover_images(&document, &url);
        if images.is_empty() {
            warn!("Found no images for listing {}", id);
        }

        let mut images_saved = 0;
        if self.config.download_images {
            for (index, image_url) in images.iter().enumerate() {
                debug!("Downloading image {} of listing {}: {}", index, id, image_url);
                let bytes = get_bytes(&self.client, image_url)
                    .await
                    .map_err(|source| FetchError::Http {
                        id,
                        stage: FetchStage::Image { index },
                        url: image_url.clone(),
                        source,
                    })?;
                self.store.write_asset(id, index, &bytes).await?;
                images_saved += 1;
            }
        }

        info!(
            "Stored listing {} ({} images found, {} saved)",
            id,
            images.len(),
            images_saved
        );

        self.throttle.pause().await;

        Ok(FetchOutcome::Fetched {
            images_found: images.len(),
            images_saved,
        })
    }
}
