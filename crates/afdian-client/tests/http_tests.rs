/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for the client over real HTTP
[POS]:    Integration tests - signed endpoints, aggregation, caching
[UPDATE]: When HTTP endpoints change
*/

mod common;

use afdian_client::{
    AfdianClient, AfdianError, CacheBackend, CacheState, ClientConfig, Credentials, Order,
    Sponsor, find_order_by_id, find_orders_by_user_id, find_sponsor_by_name,
};
use common::{
    SignedEnvelope, client_for, order, page_body, setup_mock_server, sponsor, temp_dir,
};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let _client = assert_ok!(AfdianClient::new(Credentials::new("user", "token")));
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let _client = assert_ok!(AfdianClient::with_config(
        Credentials::new("user", "token"),
        config
    ));
}

#[tokio::test]
async fn test_ping_sends_signed_envelope() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/open/ping"))
        .and(header("content-type", "application/json"))
        .and(SignedEnvelope { page: None })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ec": 200, "em": "pong"})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).ping_server().await);
}

#[tokio::test]
async fn test_ping_false_on_rejected_signature() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/open/ping"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ec": 400005, "em": "sign validation failed"})),
        )
        .mount(&server)
        .await;

    assert!(!client_for(&server).ping_server().await);
}

#[tokio::test]
async fn test_api_error_surfaces_server_message() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/open/query-order"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ec": 400001, "em": "params incomplete"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).get_orders(1).await.unwrap_err();
    assert!(matches!(err, AfdianError::Api { code: Some(400001), .. }));
    assert_eq!(err.server_message(), Some("params incomplete"));
}

#[tokio::test]
async fn test_http_status_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/open/query-sponsor"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_sponsors(1).await.unwrap_err();
    assert!(matches!(err, AfdianError::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_fetch_all_orders_across_pages() {
    let server = setup_mock_server().await;
    for (page, trade_no) in [(1, "t1"), (2, "t2"), (3, "t3")] {
        Mock::given(method("POST"))
            .and(path("/api/open/query-order"))
            .and(SignedEnvelope { page: Some(page) })
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(json!([order(trade_no, "alice", "basic")]), 3)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let orders = client_for(&server).fetch_all::<Order>().await;
    let trade_nos: Vec<&str> = orders.list.iter().map(|o| o.out_trade_no.as_str()).collect();
    assert_eq!(trade_nos, vec!["t1", "t2", "t3"]);
    assert_eq!(orders.cache, CacheState::None);

    assert_eq!(find_order_by_id(&orders, "t2").unwrap().user_id, "alice");
    assert_eq!(find_orders_by_user_id(&orders, "alice").unwrap().len(), 3);
}

#[tokio::test]
async fn test_get_all_sponsors_file_cache() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/open/query-sponsor"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(
                json!([sponsor("u1", "Lain"), sponsor("u2", "Iwakura")]),
                1,
            )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = temp_dir();
    let backend = CacheBackend::local_file(dir.join("sponsor_cache.json"));
    let client = client_for(&server);

    let fetched = assert_ok!(client.get_all_sponsors(120, &backend).await);
    assert_eq!(fetched.cache, CacheState::None);
    assert_eq!(fetched.len(), 2);

    let cached = assert_ok!(client.get_all_sponsors(120, &backend).await);
    assert_eq!(cached.cache, CacheState::Cached);
    assert_eq!(find_sponsor_by_name(&cached, "Iwakura").unwrap().user.user_id, "u2");

    let persisted = std::fs::read_to_string(dir.join("sponsor_cache.json")).unwrap();
    let persisted: serde_json::Value = serde_json::from_str(&persisted).unwrap();
    assert!(persisted["data"]["list"].is_array());
    assert!(persisted.get("cache").is_none());

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_malformed_redis_descriptor_sends_nothing() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(json!([]), 1)))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_all_orders_with_descriptor(60, "&redis=localhost")
        .await
        .unwrap_err();
    assert!(matches!(err, AfdianError::InvalidCacheAddress));
}

#[tokio::test]
async fn test_unreachable_server_yields_empty_aggregate() {
    let config = ClientConfig {
        api_root: "http://127.0.0.1:1/api/open/".to_string(),
        ..ClientConfig::default()
    };
    let client = assert_ok!(AfdianClient::with_config(
        Credentials::new("user", "token"),
        config
    ));

    let sponsors = assert_ok!(client.get_all_sponsors(0, &CacheBackend::Disabled).await);
    let sponsors: &[Sponsor] = &sponsors.list;
    assert!(sponsors.is_empty());
    assert!(!client.ping_server().await);
}
