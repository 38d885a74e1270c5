/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for afdian-client tests

use std::path::PathBuf;

use afdian_client::{AfdianClient, ClientConfig, Credentials, sign};
use serde_json::{Value, json};
use wiremock::{Match, MockServer, Request};

pub const TEST_USER_ID: &str = "test-user";
pub const TEST_TOKEN: &str = "test-token";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client talking to the mock server over real HTTP
pub fn client_for(server: &MockServer) -> AfdianClient {
    let config = ClientConfig {
        api_root: format!("{}/api/open", server.uri()),
        ..ClientConfig::default()
    };
    AfdianClient::with_config(Credentials::new(TEST_USER_ID, TEST_TOKEN), config)
        .expect("client init")
}

/// Successful envelope carrying one page of records
pub fn page_body(list: Value, total_page: u32) -> Value {
    json!({
        "ec": 200,
        "em": "ok",
        "data": {"list": list, "total_count": 0, "total_page": total_page}
    })
}

pub fn order(trade_no: &str, user_id: &str, plan_id: &str) -> Value {
    json!({
        "out_trade_no": trade_no,
        "user_id": user_id,
        "plan_id": plan_id,
        "month": 1,
        "total_amount": "5.00",
        "show_amount": "5.00",
        "status": 2
    })
}

#[allow(dead_code)]
pub fn sponsor(user_id: &str, name: &str) -> Value {
    json!({
        "all_sum_amount": "15.00",
        "create_time": 1700000000,
        "last_pay_time": 1700000100,
        "user": {"user_id": user_id, "name": name, "avatar": ""}
    })
}

#[allow(dead_code)]
pub fn temp_dir() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("afdian-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&path).expect("temp dir");
    path
}

/// Matches request bodies that are correctly signed envelopes for the test
/// credentials, optionally requiring a `page` parameter
pub struct SignedEnvelope {
    pub page: Option<u64>,
}

impl Match for SignedEnvelope {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return false;
        };
        let (Some(user_id), Some(params), Some(ts), Some(signature)) = (
            body["user_id"].as_str(),
            body["params"].as_str(),
            body["ts"].as_i64(),
            body["sign"].as_str(),
        ) else {
            return false;
        };
        if user_id != TEST_USER_ID || signature != sign(TEST_TOKEN, TEST_USER_ID, params, ts) {
            return false;
        }
        match self.page {
            Some(page) => serde_json::from_str::<Value>(params)
                .map(|params| params["page"].as_u64() == Some(page))
                .unwrap_or(false),
            None => true,
        }
    }
}
