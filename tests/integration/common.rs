use finn_harvest::{Config, ListingId};
use std::path::Path;

/// Creates a configuration pointing every endpoint at the mock server
pub fn create_test_config(server_uri: &str, data_dir: &Path, download_images: bool) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = data_dir.to_path_buf();
    config.fetch.listing_url = format!("{}/ad/{{id}}", server_uri);
    config.fetch.download_images = download_images;
    config.fetch.max_delay_ms = 0;
    config.fetch.timeout_secs = 5;
    config.enumerate.endpoint = format!("{}/ajax.jsf", server_uri);
    config
}

pub fn id(value: u64) -> ListingId {
    ListingId::new(value).unwrap()
}

/// A listing page with a category and a carousel of the given image paths
pub fn listing_page(category: &str, images: &[&str]) -> String {
    let slides: String = images
        .iter()
        .map(|src| format!(r#"<li><img src="{}"></li>"#, src))
        .collect();

    format!(
        r#"<html><head><title>Annonse</title></head><body>
        <div class="carousel" data-carousel-container><ul>{}</ul></div>
        <dl>
            <dt>Boligtype</dt>
            <dd>{}</dd>
            <dt>Eieform</dt>
            <dd>Selveier</dd>
        </dl>
        </body></html>"#,
        slides, category
    )
}
