use crate::common::{create_test_config, id, listing_page};
use finn_harvest::crawler::FetchStage;
use finn_harvest::{CacheStatus, FetchOutcome, Harvester};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cold_fetch_stores_document_and_images() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let page = listing_page("Leilighet", &["/img/a.jpg", "/img/b.jpg"]);

    Mock::given(method("GET"))
        .and(path("/ad/101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-a".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/b.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-b".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), true);
    let harvester = Harvester::new(config).unwrap();

    let outcome = harvester.fetch(id(101), false).await.unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            images_found: 2,
            images_saved: 2
        }
    );

    let store = harvester.store();
    assert_eq!(store.status(id(101)).await.unwrap(), CacheStatus::Present);
    assert_eq!(store.read_document(id(101)).await.unwrap(), page.as_bytes());
    assert_eq!(std::fs::read(store.asset_path(id(101), 0)).unwrap(), b"jpeg-a");
    assert_eq!(std::fs::read(store.asset_path(id(101), 1)).unwrap(), b"jpeg-b");
}

#[tokio::test]
async fn test_second_fetch_uses_cache() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let page = listing_page("Enebolig", &[]);

    Mock::given(method("GET"))
        .and(path("/ad/5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    harvester.fetch(id(5), false).await.unwrap();
    let outcome = harvester.fetch(id(5), false).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Cached);
    assert_eq!(
        harvester.store().read_document(id(5)).await.unwrap(),
        page.as_bytes()
    );
}

#[tokio::test]
async fn test_force_refresh_replaces_document() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/ad/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("Hytte", &[])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ad/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("Tomt", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    harvester.fetch(id(7), false).await.unwrap();
    assert_eq!(harvester.extract(id(7)).await.unwrap().category(), "hytte");

    let outcome = harvester.fetch(id(7), true).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Fetched { .. }));
    assert_eq!(harvester.extract(id(7)).await.unwrap().category(), "tomt");
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_document() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let page = listing_page("Rekkehus", &[]);

    Mock::given(method("GET"))
        .and(path("/ad/8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ad/8"))
        .respond_with(ResponseTemplate::new(500).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    harvester.fetch(id(8), false).await.unwrap();
    let err = harvester.fetch(id(8), true).await.unwrap_err();
    assert_eq!(err.stage(), Some(FetchStage::Document));
    assert_eq!(
        harvester.store().read_document(id(8)).await.unwrap(),
        page.as_bytes()
    );
}

#[tokio::test]
async fn test_image_failure_stops_sequence() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let page = listing_page("Leilighet", &["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);

    Mock::given(method("GET"))
        .and(path("/ad/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/0.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zero".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/1.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/2.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"two".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), true);
    let harvester = Harvester::new(config).unwrap();

    let err = harvester.fetch(id(9), false).await.unwrap_err();
    assert_eq!(err.stage(), Some(FetchStage::Image { index: 1 }));

    let store = harvester.store();
    assert_eq!(store.status(id(9)).await.unwrap(), CacheStatus::Present);
    assert!(store.asset_path(id(9), 0).exists());
    assert!(!store.asset_path(id(9), 1).exists());
    assert!(!store.asset_path(id(9), 2).exists());
}

#[tokio::test]
async fn test_images_skipped_when_disabled() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/ad/10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page("Leilighet", &["/img/x.jpg"])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/x.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    let outcome = harvester.fetch(id(10), false).await.unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            images_found: 1,
            images_saved: 0
        }
    );
}

#[tokio::test]
async fn test_stale_entry_is_fetched() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/ad/12"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), true);
    let harvester = Harvester::new(config).unwrap();
    harvester.store().ensure_dir(id(12)).await.unwrap();
    assert_eq!(
        harvester.store().status(id(12)).await.unwrap(),
        CacheStatus::Stale
    );

    let outcome = harvester.fetch(id(12), false).await.unwrap();
    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            images_found: 0,
            images_saved: 0
        }
    );
    assert_eq!(
        harvester.store().status(id(12)).await.unwrap(),
        CacheStatus::Present
    );
}
