//! Device lookup and management for the Mosyle APIs.
//!
//! This module covers the three device endpoints shared by both API
//! variants:
//!
//! - [`list_devices`] — retrieve the device list, optionally filtered.
//! - [`get_device`] — retrieve a single device by serial number.
//! - [`update_device`] — apply attribute changes to a device record.
//!
//! All three return the decoded response body as a raw
//! [`serde_json::Value`], unmodified. The vendor response schema varies
//! between the Business and Manager APIs and across API revisions, so the
//! client does not impose a fixed shape on it — callers pick out the keys
//! they need (`"devices"`, `"response"`, row counts, etc.).
//!
//! ## Filters
//!
//! [`list_devices`] accepts an opaque mapping of additional filter fields
//! that is merged verbatim into the request's `options` object. Useful
//! entries include `tags` (array of tag strings), `serial_numbers` (array
//! of serials), and `page` — see the Mosyle API documentation for the full
//! set. Nothing is validated locally; unknown filters are rejected by the
//! remote API, not here.

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::MosyleClient;
use crate::error::Result;

/// Sub-path for the device-list endpoint, shared by both modes.
const LIST_DEVICES_PATH: &str = "listdevices";

/// Sub-path for the single-device detail endpoint.
const DEVICE_INFO_PATH: &str = "getdeviceinfo";

/// Sub-path for the device-update endpoint.
const UPDATE_DEVICE_PATH: &str = "devices";

// ── Request-body builders ──────────────────────────────────────────────

/// Builds the `options` object common to the list and detail endpoints.
///
/// Extra filters are merged in first, then the positional `os` argument
/// is written, so a stray `os` key inside the filters never wins over the
/// one the caller passed explicitly.
fn options_body(os: &str, extra_filters: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut options = extra_filters.cloned().unwrap_or_default();
    options.insert("os".to_string(), Value::String(os.to_string()));

    let mut body = Map::new();
    body.insert("options".to_string(), Value::Object(options));
    body
}

/// Builds the body for the update endpoint: a single-element `elements`
/// array carrying the serial number plus the caller's field mapping.
///
/// Fields are copied verbatim; the serial number is written last so a
/// `serialnumber` key inside the field mapping cannot redirect the update
/// to a different device.
fn update_body(os: &str, serial: &str, fields: &Map<String, Value>) -> Map<String, Value> {
    let mut element = fields.clone();
    element.insert(
        "serialnumber".to_string(),
        Value::String(serial.to_string()),
    );

    let mut body = options_body(os, None);
    body.insert(
        "elements".to_string(),
        Value::Array(vec![Value::Object(element)]),
    );
    body
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the device list for one operating system.
///
/// `os` is the vendor OS identifier (`"macos"`, `"ios"`, `"tvos"`).
/// `extra_filters` is merged verbatim into the request's `options` object;
/// pass `None` for an unfiltered listing. Exactly one request is issued
/// per call — paging, when needed, is driven by the caller via a `page`
/// filter entry.
///
/// # Errors
///
/// - `MosyleError::Auth` — the API rejected the configured credentials.
/// - `MosyleError::Validation` — the API rejected a filter.
/// - `MosyleError::Transport` / `MosyleError::Decode` /
///   `MosyleError::Api` — see [`crate::error::MosyleError`].
pub async fn list_devices(
    client: &MosyleClient,
    os: &str,
    extra_filters: Option<&Map<String, Value>>,
) -> Result<Value> {
    debug!(os, "listing devices");
    client.post(LIST_DEVICES_PATH, options_body(os, extra_filters)).await
}

/// Retrieves a single device record by serial number.
///
/// The request is the list shape narrowed to one serial: the body carries
/// `options.serial_numbers = [serial]`, directed at the detail endpoint.
/// The response is returned undecoded beyond JSON; whether a miss is an
/// empty collection or an error payload is the vendor's choice and is
/// passed through as-is.
///
/// # Errors
///
/// Same taxonomy as [`list_devices`]; a serial the API reports as not
/// found surfaces as `MosyleError::Validation`.
pub async fn get_device(client: &MosyleClient, os: &str, serial: &str) -> Result<Value> {
    debug!(os, serial, "fetching device info");
    let mut body = options_body(os, None);
    if let Some(Value::Object(options)) = body.get_mut("options") {
        options.insert(
            "serial_numbers".to_string(),
            Value::Array(vec![Value::String(serial.to_string())]),
        );
    }
    client.post(DEVICE_INFO_PATH, body).await
}

/// Updates one or more attributes of a device record.
///
/// `fields` maps attribute names to new values (e.g.
/// `{"asset_tag": "1234"}`) and is sent verbatim — the set of updatable
/// attributes is defined and enforced by the remote API. Returns the
/// API's response unmodified, which for both variants echoes the updated
/// record.
///
/// No idempotency guarantee is made; retrying a failed update is the
/// caller's responsibility.
///
/// # Errors
///
/// Same taxonomy as [`list_devices`]; an unknown attribute or unknown
/// serial surfaces as `MosyleError::Validation` carrying the vendor's
/// error payload verbatim.
pub async fn update_device(
    client: &MosyleClient,
    os: &str,
    serial: &str,
    fields: &Map<String, Value>,
) -> Result<Value> {
    debug!(os, serial, "updating device attributes");
    client.post(UPDATE_DEVICE_PATH, update_body(os, serial, fields)).await
}
