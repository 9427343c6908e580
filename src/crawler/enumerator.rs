//! Discovery of sold listings through the map query endpoint
//!
//! One form-encoded POST returns the points of interest inside a bounding
//! box, grouped by map cell:
//!
//! ```json
//! { "numberOfPois": 3, "pois": { "cell-a": { "ids": ["101", "102"] }, "cell-b": { "ids": ["101"] } } }
//! ```
//!
//! The per-cell lists are flattened and deduplicated. Entries that are not
//! valid identifiers are skipped.

use crate::config::EnumerateConfig;
use crate::listing::ListingId;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while enumerating listings
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("Map query failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed map query response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapResponse {
    #[serde(default)]
    number_of_pois: u64,
    #[serde(default)]
    pois: Option<BTreeMap<String, MapCell>>,
}

#[derive(Debug, Deserialize)]
struct MapCell {
    #[serde(default)]
    ids: Vec<String>,
}

/// Builds the form fields of the map query
///
/// The viewport center is derived from the configured width and height.
pub fn form_fields(config: &EnumerateConfig) -> Vec<(&'static str, String)> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    vec![
        ("updateCoords", "updateCoords".to_string()),
        ("layers", config.layers.clone()),
        ("mapType", config.map_type.clone()),
        ("h", config.height.to_string()),
        ("w", config.width.to_string()),
        ("heightx", config.height.to_string()),
        ("widthx", config.width.to_string()),
        ("x", (f64::from(config.width) / 2.0).to_string()),
        ("cy", (f64::from(config.height) / 2.0).to_string()),
        ("scalex", config.scale.to_string()),
        ("level", config.level.to_string()),
        ("ads", "false".to_string()),
        ("datetime", timestamp.to_string()),
        ("touch", "0".to_string()),
        ("minX", config.min_x.to_string()),
        ("minY", config.min_y.to_string()),
        ("maxX", config.max_x.to_string()),
        ("maxY", config.max_y.to_string()),
        ("proj", config.projection.clone()),
        ("autoLimit", "true".to_string()),
        ("activetab", "iad".to_string()),
        ("searchKey", config.search_key.clone()),
        ("showSold", config.show_sold.to_string()),
        ("showActive", config.show_active.to_string()),
        ("responseType", "json".to_string()),
    ]
}

/// Decodes a map query response into unique identifiers
///
/// Identifiers keep the order of their first appearance, walking cells in
/// key order.
pub fn decode_ids(body: &[u8]) -> Result<Vec<ListingId>, serde_json::Error> {
    let response: MapResponse = serde_json::from_slice(body)?;

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut skipped = 0usize;

    for cell in response.pois.unwrap_or_default().into_values() {
        for raw in cell.ids {
            match raw.parse::<ListingId>() {
                Ok(id) => {
                    if seen.insert(id) {
                        ids.push(id);
                    }
                }
                Err(_) => skipped += 1,
            }
        }
    }

    debug!(
        "Map response reported {} points, {} unique ids, {} unparseable",
        response.number_of_pois,
        ids.len(),
        skipped
    );

    Ok(ids)
}

/// Issues the map query for sold listings
#[derive(Debug, Clone)]
pub struct Enumerator {
    client: Client,
    config: EnumerateConfig,
}

impl Enumerator {
    pub fn new(client: Client, config: EnumerateConfig) -> Self {
        Self { client, config }
    }

    /// Lists the identifiers of sold listings inside the configured bounds
    pub async fn enumerate_sold(&self) -> Result<Vec<ListingId>, EnumerateError> {
        let body = self
            .client
            .post(&self.config.endpoint)
            .form(&form_fields(&self.config))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let ids = decode_ids(&body)?;
        info!("Discovered {} listings at {}", ids.len(), self.config.endpoint);
        Ok(ids)
    }
}
