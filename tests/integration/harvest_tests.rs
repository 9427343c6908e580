use crate::common::{create_test_config, id, listing_page};
use finn_harvest::{FetchOutcome, Harvester};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_harvest_cycle() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/ajax.jsf"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"numberOfPois": 3, "pois": {
                "a": {"ids": ["101"]},
                "b": {"ids": ["102", "101"]}
            }}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ad/101"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            "  Leilighet\n",
            &["/img/101-0.jpg", "/img/101-1.jpg"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ad/102"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page("Enebolig", &["/img/102-0.jpg"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/101-0.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/101-1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"b".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/102-0.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"c".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), true);
    let harvester = Harvester::new(config).unwrap();

    let ids = harvester.enumerate_sold().await.unwrap();
    assert_eq!(ids, vec![id(101), id(102)]);

    let results = harvester.fetch_many(&ids, false).await;
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0].1.as_ref().unwrap(),
        &FetchOutcome::Fetched {
            images_found: 2,
            images_saved: 2
        }
    );

    // Already cached: no further requests
    let again = harvester.fetch_many(&ids, false).await;
    assert!(again
        .iter()
        .all(|(_, r)| matches!(r, Ok(FetchOutcome::Cached))));

    assert_eq!(harvester.cached_identifiers().await.unwrap(), ids);

    let records = harvester.extract_cached().await.unwrap();
    let categories: Vec<_> = records
        .iter()
        .map(|(_, r)| r.as_ref().unwrap().category().to_string())
        .collect();
    assert_eq!(categories, vec!["leilighet", "enebolig"]);
}

#[tokio::test]
async fn test_batch_continues_past_failure() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/ad/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ad/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page("Hytte", &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    let results = harvester.fetch_many(&[id(1), id(2)], false).await;
    assert!(results[0].1.is_err());
    assert!(results[1].1.is_ok());

    let err = harvester.extract(id(1)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(harvester.extract(id(2)).await.unwrap().category(), "hytte");
}

#[tokio::test]
async fn test_missing_category_fails_extraction() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/ad/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><h1>Solgt</h1></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), temp_dir.path(), false);
    let harvester = Harvester::new(config).unwrap();

    harvester.fetch(id(3), false).await.unwrap();
    let err = harvester.extract(id(3)).await.unwrap_err();
    assert!(matches!(
        err,
        finn_harvest::extract::ExtractError::Field { ref field, .. } if field == "category"
    ));
}
