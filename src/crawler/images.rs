//! Image discovery in listing pages
//!
//! Listing images live in the image carousel, an element carrying the
//! `data-carousel-container` attribute. Every `<img>` below it contributes its
//! `src` and `data-src` values, in that order.

use crate::tree::{attr, document_root, find_all, find_first, has_attr};
use scraper::Html;
use url::Url;

/// Attribute marking the image carousel
pub const CAROUSEL_ATTR: &str = "data-carousel-container";

/// Image attributes holding a URL; lazy-loaded images use `data-src`
static IMAGE_ATTRS: [&str; 2] = ["src", "data-src"];

/// Finds the image URLs of a listing page
///
/// # Arguments
///
/// * `document` - The raw listing document
/// * `page_url` - The URL the document was fetched from, for resolving relative links
///
/// # Returns
///
/// Absolute image URLs in document order; empty if the page has no carousel
pub fn discover_images(document: &[u8], page_url: &str) -> Vec<String> {
    let html = Html::parse_document(&String::from_utf8_lossy(document));
    let base = Url::parse(page_url).ok();

    let Some(carousel) = find_first(document_root(&html), |n| has_attr(n, CAROUSEL_ATTR)) else {
        return Vec::new();
    };

    find_all(carousel, "img")
        .flat_map(|img| IMAGE_ATTRS.iter().filter_map(move |name| attr(&img, name)))
        .filter_map(|src| resolve_image_url(src, base.as_ref()))
        .collect()
}

/// Resolves an image reference to an absolute URL
///
/// Returns None if the reference should be skipped:
/// - empty values
/// - inline `data:` images
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
fn resolve_image_url(src: &str, base: Option<&Url>) -> Option<String> {
    let src = src.trim();

    if src.is_empty() || src.starts_with("data:") {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(src).ok()?,
        None => Url::parse(src).ok()?,
    };

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Some(resolved.to_string())
    } else {
        None
    }
}
