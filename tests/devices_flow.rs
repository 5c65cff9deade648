//! Integration tests for the device endpoint family using wiremock.
//!
//! These tests mock the Mosyle API to verify that the devices module
//! correctly constructs requests, passes responses through unmodified,
//! and targets the right endpoint for each operation:
//!
//! - POST /listdevices   — list_devices (with and without filters)
//! - POST /getdeviceinfo — get_device
//! - POST /devices       — update_device

use mosyle::account::{Credentials, Mode};
use mosyle::client::MosyleClient;
use mosyle::devices::{get_device, list_devices, update_device};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates a school-mode client pointed at the given wiremock server.
async fn mock_client(server: &MockServer) -> MosyleClient {
    let creds = Credentials::new("tok-123", "admin@example.com", "hunter2", None, Mode::School);
    MosyleClient::with_base_url(creds, &server.uri())
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

// ── list_devices ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_devices_returns_fixture_unmodified() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/listdevices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": []})))
        .mount(&server)
        .await;

    let response = list_devices(&client, "macos", None).await.unwrap();

    // The client is a pure conduit: the caller sees the vendor payload
    // exactly as sent, with no envelope stripping or reshaping.
    assert_eq!(response, json!({"devices": []}));
}

#[tokio::test]
async fn list_devices_sends_os_inside_options() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/listdevices"))
        .and(body_partial_json(json!({"options": {"os": "ios"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "devices": [{"serial_number": "DMPX1", "os": "ios"}]
        })))
        .mount(&server)
        .await;

    let response = list_devices(&client, "ios", None).await.unwrap();
    assert_eq!(response["devices"][0]["serial_number"], "DMPX1");
}

#[tokio::test]
async fn list_devices_merges_extra_filters_verbatim() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    // The mock matches on the filter entries to verify they reach the
    // wire inside options, typed as given.
    Mock::given(method("POST"))
        .and(path("/listdevices"))
        .and(body_partial_json(json!({
            "options": {
                "os": "macos",
                "tags": ["Lab", "Loaner"],
                "page": 3
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": []})))
        .mount(&server)
        .await;

    let filters = object(json!({"tags": ["Lab", "Loaner"], "page": 3}));
    let response = list_devices(&client, "macos", Some(&filters)).await.unwrap();
    assert_eq!(response, json!({"devices": []}));
}

// ── get_device ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_device_targets_detail_endpoint_with_serial() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/getdeviceinfo"))
        .and(body_partial_json(json!({
            "options": {
                "os": "macos",
                "serial_numbers": ["C02XL0GZJGH5"]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "devices": [{
                "serial_number": "C02XL0GZJGH5",
                "device_name": "lab-mac-07",
                "asset_tag": "0042"
            }],
            "rows": "1"
        })))
        .mount(&server)
        .await;

    let response = get_device(&client, "macos", "C02XL0GZJGH5").await.unwrap();

    assert_eq!(response["devices"][0]["serial_number"], "C02XL0GZJGH5");
    assert_eq!(response["devices"][0]["device_name"], "lab-mac-07");
    // Vendor metadata like the row count rides along untouched.
    assert_eq!(response["rows"], "1");
}

#[tokio::test]
async fn get_device_miss_passes_empty_collection_through() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    // Whether a missing serial is an empty collection or an error payload
    // is the vendor's choice; an empty collection is not an error here.
    Mock::given(method("POST"))
        .and(path("/getdeviceinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"devices": []})))
        .mount(&server)
        .await;

    let response = get_device(&client, "macos", "NOSUCH").await.unwrap();
    assert_eq!(response, json!({"devices": []}));
}

// ── update_device ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_device_sends_serial_and_fields_in_elements() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/devices"))
        .and(body_partial_json(json!({
            "elements": [{
                "serialnumber": "SERIAL123",
                "asset_tag": "1234"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "response": [{
                "serial_number": "SERIAL123",
                "asset_tag": "1234"
            }]
        })))
        .mount(&server)
        .await;

    let fields = object(json!({"asset_tag": "1234"}));
    let response = update_device(&client, "macos", "SERIAL123", &fields)
        .await
        .unwrap();

    // The echoed success response comes back unmodified.
    assert_eq!(response["response"][0]["serial_number"], "SERIAL123");
    assert_eq!(response["response"][0]["asset_tag"], "1234");
}

#[tokio::test]
async fn update_device_full_body_shape() {
    let server = MockServer::start().await;
    let client = mock_client(&server).await;

    // Exact body match: credentials injected at the top level, os inside
    // options, serial and fields inside a single-element elements array.
    Mock::given(method("POST"))
        .and(path("/devices"))
        .and(body_json(json!({
            "accessToken": "tok-123",
            "options": {"os": "macos"},
            "elements": [{
                "name": "lab-mac-07",
                "serialnumber": "SERIAL123"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .mount(&server)
        .await;

    let fields = object(json!({"name": "lab-mac-07"}));
    let response = update_device(&client, "macos", "SERIAL123", &fields)
        .await
        .unwrap();
    assert_eq!(response, json!({"status": "OK"}));
}
