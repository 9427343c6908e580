//! Crawler module for listing discovery and download
//!
//! This module contains the network side of the harvester, including:
//! - Enumerating sold listings through the map query endpoint
//! - Fetching listing pages into the document store
//! - Discovering and downloading listing images
//! - The politeness delay applied after every fetch
//! - Overall harvest coordination

mod enumerator;
mod fetcher;
mod harvester;
mod images;
mod throttle;

pub use enumerator::{decode_ids, form_fields, EnumerateError, Enumerator};
pub use fetcher::{build_http_client, FetchError, FetchOutcome, FetchStage, Fetcher};
pub use harvester::Harvester;
pub use images::{discover_images, CAROUSEL_ATTR};
pub use throttle::Throttle;
