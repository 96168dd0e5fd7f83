//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the listing gateway and
//! exercise pagination, retry, soft failure, and deduplication end-to-end.

use adharvest::config::{ApiConfig, Config, HarvesterConfig, OutputConfig, UserAgentConfig};
use adharvest::crawler::{build_http_client, collect_identifiers, fetch_detail, harvest};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock gateway, with pacing
/// delays zeroed so the tests run instantly
fn create_test_config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            category_id: 2010,
            region_id: 12000,
            timeout_secs: 5,
        },
        harvester: HarvesterConfig {
            target_count: 3000,
            page_size: 20,
            batch_size: 200,
            batch_pause_ms: 0,
            concurrency: 10,
            retry_attempts: 5,
            retry_delay_ms: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            csv_path: "./test_listings.csv".to_string(),
        },
    }
}

/// Builds a list-endpoint page body from listing ids
fn list_body(ids: &[u64]) -> Value {
    json!({
        "ads": ids.iter().map(|id| json!({"list_id": id})).collect::<Vec<_>>()
    })
}

/// Builds a complete detail-endpoint body
fn detail_body(id: u64, year: &str, fuel: &str, price: i64) -> Value {
    json!({
        "ad": {
            "list_id": id,
            "list_time": 1709251200000i64,
            "price": price
        },
        "params": [
            {"id": "mfdate", "value": year},
            {"id": "carorigin", "value": "Việt Nam"},
            {"id": "gearbox", "value": "AT"}
        ],
        "parameters": [
            {"id": "fuel", "value": fuel},
            {"id": "mileage_v2", "value": 45000}
        ]
    })
}

#[tokio::test]
async fn test_first_attempt_success_fetches_once() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    // A complete response must be fetched exactly once: no retries
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(101, "2015", "petrol", 500_000_000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = fetch_detail(&client, &config, 101).await.unwrap();

    assert_eq!(record.post_date, "2024-03-01");
    assert_eq!(record.production_year, "2015");
    assert_eq!(record.fuel, "petrol");
    assert_eq!(record.origin, "Việt Nam");
    assert_eq!(record.transmission, "AT");
    assert_eq!(record.odometer, "45000");
    assert_eq!(record.price, 500_000_000);
}

#[tokio::test]
async fn test_retry_until_attempt_succeeds() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    // Two server errors, then a good response on the third attempt
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/102"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/102"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(102, "2018", "diesel", 700_000_000)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = fetch_detail(&client, &config, 102).await.unwrap();
    assert_eq!(record.production_year, "2018");
}

#[tokio::test]
async fn test_incomplete_record_is_retried() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    // HTTP 200 but both signal fields empty: retried like a network error
    let incomplete = json!({
        "ad": {"list_id": 103, "price": 1},
        "params": [],
        "parameters": []
    });

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/103"))
        .respond_with(ResponseTemplate::new(200).set_body_json(incomplete))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/103"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(103, "", "petrol", 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let record = fetch_detail(&client, &config, 103).await.unwrap();
    // One signal field is enough
    assert_eq!(record.production_year, "");
    assert_eq!(record.fuel, "petrol");
}

#[tokio::test]
async fn test_retry_exhaustion_returns_absent() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri());
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    // Every attempt fails; exactly the retry budget is spent
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/104"))
        .respond_with(ResponseTemplate::new(503))
        .expect(5)
        .mount(&mock_server)
        .await;

    let record = fetch_detail(&client, &config, 104).await;
    assert!(record.is_none());
}

#[tokio::test]
async fn test_pagination_stops_at_target_count() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 4;
    config.harvester.page_size = 2;
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[1, 2])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[3, 4])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // The target is reached after two pages; no third request
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[5, 6])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ids = collect_identifiers(&client, &config).await;
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_pagination_overshoots_target_on_full_final_page() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 50;
    config.harvester.page_size = 20;
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    for (offset, start) in [(0u64, 1u64), (20, 21), (40, 41)] {
        let page: Vec<u64> = (start..start + 20).collect();
        Mock::given(method("GET"))
            .and(path("/v1/public/ad-listing"))
            .and(query_param("o", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&page)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    // Target reached after the third page; no fourth request
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[999])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ids = collect_identifiers(&client, &config).await;
    // The final full page pushes past the target; everything is kept
    assert_eq!(ids.len(), 60);
    assert_eq!(ids[0], 1);
    assert_eq!(ids[59], 60);
}

#[tokio::test]
async fn test_pagination_stops_on_short_page() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 50;
    config.harvester.page_size = 20;
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    let full_page: Vec<u64> = (1..=20).collect();

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&full_page)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Second page comes back short: pagination ends below the target
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[21, 22, 23])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ids = collect_identifiers(&client, &config).await;
    assert_eq!(ids.len(), 23);
}

#[tokio::test]
async fn test_pagination_treats_error_status_as_end() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 40;
    config.harvester.page_size = 20;
    let client = build_http_client(&config.api, &config.user_agent).unwrap();

    let full_page: Vec<u64> = (1..=20).collect();

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&full_page)))
        .mount(&mock_server)
        .await;

    // A failed page ends pagination early instead of aborting the run
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "20"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let ids = collect_identifiers(&client, &config).await;
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_full_harvest_with_soft_failure_and_dedup() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 4;
    config.harvester.page_size = 4;
    // One listing per batch: a dead listing in an early batch must not
    // block the later batches
    config.harvester.batch_size = 1;
    config.harvester.retry_attempts = 2;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[201, 202, 203, 204])))
        .mount(&mock_server)
        .await;

    // 201 never resolves
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/201"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    // 202 and 203 are two listings of the same car: identical records
    for id in [202u64, 203] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/public/ad-listing/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(detail_body(0, "2015", "petrol", 500_000_000)),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/204"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(0, "2020", "diesel", 900_000_000)))
        .mount(&mock_server)
        .await;

    let (records, summary) = harvest(config).await.unwrap();

    // 201 dropped, 202/203 collapsed, 204 retained
    assert_eq!(records.len(), 2);
    assert_eq!(summary.identifiers_collected, 4);
    assert_eq!(summary.records_fetched, 3);
    assert_eq!(summary.records_retained, 2);
    assert_eq!(summary.batch_count, 4);

    let years: Vec<&str> = records.iter().map(|r| r.production_year.as_str()).collect();
    assert_eq!(years, vec!["2015", "2020"]);
}

#[tokio::test]
async fn test_record_differing_in_one_field_is_retained() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.harvester.target_count = 2;
    config.harvester.page_size = 2;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing"))
        .and(query_param("o", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[301, 302])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/301"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(0, "2015", "petrol", 500_000_000)))
        .mount(&mock_server)
        .await;

    // Same car, different asking price: distinct record
    Mock::given(method("GET"))
        .and(path("/v1/public/ad-listing/302"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(0, "2015", "petrol", 499_000_000)))
        .mount(&mock_server)
        .await;

    let (records, summary) = harvest(config).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(summary.records_retained, 2);
}
