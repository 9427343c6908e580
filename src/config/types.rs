use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Finn-Harvest
///
/// Every section is optional; omitted keys fall back to the values used
/// against the live catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub enumerate: EnumerateConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Local cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root data directory; listings live under `<data-dir>/cache/<id>/`
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Listing page and image fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// URL template for a listing page; `{id}` is replaced with the identifier
    #[serde(rename = "listing-url", default = "default_listing_url")]
    pub listing_url: String,

    /// Re-download listings that are already cached
    #[serde(rename = "force-refresh", default)]
    pub force_refresh: bool,

    /// Download the images referenced by each listing
    #[serde(rename = "download-images", default)]
    pub download_images: bool,

    /// Upper bound (exclusive) of the random delay after each fetch, in milliseconds
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            listing_url: default_listing_url(),
            force_refresh: false,
            download_images: false,
            max_delay_ms: default_max_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Renders the listing URL for an identifier
    pub fn listing_url_for(&self, id: crate::ListingId) -> String {
        self.listing_url.replace("{id}", &id.to_string())
    }
}

/// Map query used to discover sold listings
#[derive(Debug, Clone, Deserialize)]
pub struct EnumerateConfig {
    /// Map query endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Saved search the query runs against
    #[serde(rename = "search-key", default = "default_search_key")]
    pub search_key: String,

    #[serde(rename = "min-x", default = "default_min_x")]
    pub min_x: f64,
    #[serde(rename = "min-y", default = "default_min_y")]
    pub min_y: f64,
    #[serde(rename = "max-x", default = "default_max_x")]
    pub max_x: f64,
    #[serde(rename = "max-y", default = "default_max_y")]
    pub max_y: f64,

    /// Projection of the bounding box coordinates
    #[serde(default = "default_projection")]
    pub projection: String,

    /// Viewport width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Zoom level
    #[serde(default = "default_level")]
    pub level: f64,

    /// Map scale
    #[serde(default = "default_scale")]
    pub scale: f64,

    #[serde(default = "default_layers")]
    pub layers: String,

    #[serde(rename = "map-type", default = "default_map_type")]
    pub map_type: String,

    #[serde(rename = "show-sold", default = "default_true")]
    pub show_sold: bool,

    #[serde(rename = "show-active", default)]
    pub show_active: bool,
}

impl Default for EnumerateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            search_key: default_search_key(),
            min_x: default_min_x(),
            min_y: default_min_y(),
            max_x: default_max_x(),
            max_y: default_max_y(),
            projection: default_projection(),
            width: default_width(),
            height: default_height(),
            level: default_level(),
            scale: default_scale(),
            layers: default_layers(),
            map_type: default_map_type(),
            show_sold: true,
            show_active: false,
        }
    }
}

/// Extra field extractors run after the built-in ones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// One labeled field to extract
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    /// Name of the field in the output record
    pub field: String,

    /// Label text that anchors the value in the page
    pub label: String,

    #[serde(default)]
    pub kind: FieldKind,

    #[serde(rename = "on-missing", default)]
    pub on_missing: MissingPolicy,
}

/// How an extracted value is normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Trimmed, lowercased text
    #[default]
    Text,
    /// Digits of the value as an integer
    Integer,
}

/// What happens when a field's anchor cannot be located
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Abort extraction of the whole record
    #[default]
    Fail,
    /// Leave the field at its empty value and continue
    Default,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_listing_url() -> String {
    "https://www.finn.no/realestate/homes/ad.html?finnkode={id}".to_string()
}

fn default_max_delay_ms() -> u64 {
    3000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("finn-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_endpoint() -> String {
    "https://kart.finn.no/ajax.jsf".to_string()
}

fn default_search_key() -> String {
    "search_id_realestate_homes_sold".to_string()
}

fn default_min_x() -> f64 {
    1162400.6830265
}

fn default_min_y() -> f64 {
    8360525.2180038
}

fn default_max_x() -> f64 {
    1211004.1229177
}

fn default_max_y() -> f64 {
    8397994.649264
}

fn default_projection() -> String {
    "EPSG:3857".to_string()
}

fn default_width() -> u32 {
    1183
}

fn default_height() -> u32 {
    912
}

fn default_level() -> f64 {
    11.925
}

fn default_scale() -> f64 {
    205424.10263878873
}

fn default_layers() -> String {
    "10002".to_string()
}

fn default_map_type() -> String {
    "normap".to_string()
}

fn default_true() -> bool {
    true
}
