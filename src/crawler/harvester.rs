//! Harvester - orchestration of enumeration, fetching and extraction
//!
//! The harvester owns everything a run needs: the configuration, the
//! document store, one HTTP client, and the extractor pipeline. All work is
//! sequential; batch helpers report one result per identifier so a caller
//! can decide whether to stop at the first failure.

use crate::config::Config;
use crate::crawler::enumerator::{EnumerateError, Enumerator};
use crate::crawler::fetcher::{build_http_client, FetchError, FetchOutcome, Fetcher};
use crate::extract::{extract_listing, ExtractError, ExtractorPipeline, ListingRecord};
use crate::listing::ListingId;
use crate::storage::{DocumentStore, StorageError};
use crate::HarvestError;
use tracing::{error, info};

/// Main harvester structure
pub struct Harvester {
    config: Config,
    fetcher: Fetcher,
    enumerator: Enumerator,
    pipeline: ExtractorPipeline,
}

impl Harvester {
    /// Creates a new harvester instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Successfully created harvester
    /// * `Err(HarvestError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.fetch)?;
        let store = DocumentStore::new(&config.storage.data_dir);
        let pipeline = ExtractorPipeline::from_config(&config.extract);

        info!(
            "Harvester ready (cache: {}, fields: {})",
            store.cache_root().display(),
            pipeline.fields().join(", ")
        );

        Ok(Self {
            fetcher: Fetcher::new(client.clone(), store, config.fetch.clone()),
            enumerator: Enumerator::new(client, config.enumerate.clone()),
            pipeline,
            config,
        })
    }

    /// Replaces the extractor pipeline
    pub fn with_pipeline(mut self, pipeline: ExtractorPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        self.fetcher.store()
    }

    /// Lists the identifiers of sold listings
    pub async fn enumerate_sold(&self) -> Result<Vec<ListingId>, EnumerateError> {
        self.enumerator.enumerate_sold().await
    }

    /// Fetches one listing; see [`Fetcher::fetch`]
    pub async fn fetch(&self, id: ListingId, force: bool) -> Result<FetchOutcome, FetchError> {
        self.fetcher.fetch(id, force).await
    }

    /// Fetches listings one after another
    ///
    /// Failures are logged and returned alongside successes; they do not
    /// stop the batch.
    pub async fn fetch_many(
        &self,
        ids: &[ListingId],
        force: bool,
    ) -> Vec<(ListingId, Result<FetchOutcome, FetchError>)> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            let result = self.fetch(id, force).await;
            if let Err(e) = &result {
                error!("Error fetching listing {}: {}", id, e);
            }
            results.push((id, result));
        }

        let fetched = results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(FetchOutcome::Fetched { .. })))
            .count();
        info!("Batch complete: {} of {} listings downloaded", fetched, ids.len());
        results
    }

    /// Extracts a record from one cached listing
    pub async fn extract(&self, id: ListingId) -> Result<ListingRecord, ExtractError> {
        extract_listing(self.store(), &self.pipeline, id).await
    }

    /// Lists the identifiers that have a cache entry
    pub async fn cached_identifiers(&self) -> Result<Vec<ListingId>, StorageError> {
        self.store().list_cached_identifiers().await
    }

    /// Extracts a record from every cached listing
    ///
    /// Listing the cache must succeed; extraction results are reported per
    /// identifier.
    pub async fn extract_cached(
        &self,
    ) -> Result<Vec<(ListingId, Result<ListingRecord, ExtractError>)>, StorageError> {
        let ids = self.cached_identifiers().await?;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push((id, self.extract(id).await));
        }
        Ok(results)
    }
}
