//! Extraction of structured fields from cached listings
//!
//! A cached document is parsed once and handed to an ordered list of
//! [`FieldExtractor`]s. Each extractor fills one field of a [`ListingRecord`].
//! When an extractor fails, its [`MissingPolicy`] decides between aborting
//! the whole record and leaving the field at its empty value.

mod extractors;
mod record;

pub use extractors::{FieldExtractor, FieldFailure, LabeledField};
pub use record::{FieldValue, ListingRecord};

use crate::config::{ExtractConfig, MissingPolicy};
use crate::listing::ListingId;
use crate::storage::{DocumentStore, StorageError};
use crate::tree::{document_root, DocNode};
use scraper::Html;
use thiserror::Error;
use tracing::{debug, warn};

/// Record field holding the listing category
pub const CATEGORY_FIELD: &str = "category";

/// Label that anchors the category value in a listing page
pub const CATEGORY_LABEL: &str = "Boligtype";

/// Errors that can occur while extracting a record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Field '{field}' of listing {id}: {reason}")]
    Field {
        id: ListingId,
        field: String,
        reason: FieldFailure,
    },
}

impl ExtractError {
    /// Returns true if the listing has no cached document
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }
}

/// Ordered sequence of field extractors
pub struct ExtractorPipeline {
    extractors: Vec<Box<dyn FieldExtractor>>,
}

impl ExtractorPipeline {
    /// Creates a pipeline with no extractors
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Creates the built-in pipeline: the listing category, which must be present
    pub fn standard() -> Self {
        Self::empty().with(LabeledField::new(CATEGORY_FIELD, CATEGORY_LABEL))
    }

    /// Creates the built-in pipeline followed by the configured fields
    pub fn from_config(config: &ExtractConfig) -> Self {
        config
            .fields
            .iter()
            .fold(Self::standard(), |pipeline, entry| {
                pipeline.with(LabeledField::from(entry))
            })
    }

    /// Appends an extractor
    pub fn with(mut self, extractor: impl FieldExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Names of the fields populated, in run order
    pub fn fields(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.field()).collect()
    }

    /// Runs every extractor against a parsed document
    pub fn run(&self, id: ListingId, root: DocNode<'_>) -> Result<ListingRecord, ExtractError> {
        let mut record = ListingRecord::new(id);

        for extractor in &self.extractors {
            match extractor.extract(root, &mut record) {
                Ok(()) => {}
                Err(reason) => match extractor.on_missing() {
                    MissingPolicy::Fail => {
                        return Err(ExtractError::Field {
                            id,
                            field: extractor.field().to_string(),
                            reason,
                        });
                    }
                    MissingPolicy::Default => {
                        warn!(
                            "Listing {}: field '{}' left empty ({})",
                            id,
                            extractor.field(),
                            reason
                        );
                        record.set(extractor.field(), extractor.empty_value());
                    }
                },
            }
        }

        Ok(record)
    }

    /// Parses a raw document and runs every extractor against it
    pub fn run_document(&self, id: ListingId, bytes: &[u8]) -> Result<ListingRecord, ExtractError> {
        let html = Html::parse_document(&String::from_utf8_lossy(bytes));
        self.run(id, document_root(&html))
    }
}

impl Default for ExtractorPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Extracts a record from the cached document of one listing
///
/// Fails with a not-found storage error if the listing was never fetched.
pub async fn extract_listing(
    store: &DocumentStore,
    pipeline: &ExtractorPipeline,
    id: ListingId,
) -> Result<ListingRecord, ExtractError> {
    let bytes = store.read_document(id).await?;
    debug!("Extracting {} fields from listing {}", pipeline.extractors.len(), id);
    pipeline.run_document(id, &bytes)
}
