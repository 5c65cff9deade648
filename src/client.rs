//! Authenticated HTTP client for the Mosyle device-management APIs.
//!
//! `MosyleClient` wraps a `reqwest::Client` and a [`Credentials`] set,
//! providing a single JSON POST helper that the endpoint functions in
//! [`crate::devices`] build on.
//!
//! Authentication model:
//! - Per-request: every outgoing body carries the integration access
//!   token, and Business mode additionally embeds the account email and
//!   password. There is no login round-trip, no bearer token, and no
//!   refresh state — each call stands alone.
//! - Because no mutable state exists, `&self` methods are safe to call
//!   concurrently from multiple tasks; `reqwest::Client` is internally
//!   reference-counted and concurrency-safe.
//!
//! Response classification happens in one place (`post`), so all three
//! operations share an identical error taxonomy.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::account::{Credentials, Mode};
use crate::error::{MosyleError, Result};

/// User-Agent sent on every request, e.g. `mosyle-rs/0.1.0`.
const USER_AGENT: &str = concat!("mosyle-rs/", env!("CARGO_PKG_VERSION"));

/// Connect timeout for the Mosyle API HTTP client.
/// Covers TCP + TLS handshake only.
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout for Mosyle API calls.
/// Covers the full round-trip including response body download. Device
/// listings for large fleets can run to several MB of JSON, so this is
/// deliberately generous; individual get/update calls complete in a few
/// seconds.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds a `reqwest::Client` with explicit timeouts and User-Agent for
/// Mosyle API calls.
fn build_api_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client for Mosyle API")
}

/// Authenticated HTTP client for the Mosyle REST APIs.
///
/// Design decisions:
/// - `credentials` is owned and immutable; there is no interior
///   mutability because the Mosyle auth scheme keeps no session state.
/// - `base_url` is stored as a `String` rather than derived from the mode
///   on every call so it can be overridden in tests (e.g. pointing at a
///   wiremock server).
pub struct MosyleClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl MosyleClient {
    /// Creates a client for the given account.
    ///
    /// `mode` selects the API variant (`"business"` or `"school"`,
    /// case-insensitive) and with it the base URL and body shape.
    /// `reserved` is stored verbatim and never transmitted.
    ///
    /// Performs no network activity; construction cannot observe whether
    /// the credentials are actually valid.
    ///
    /// # Errors
    ///
    /// - `MosyleError::Config` — `mode` is not one of the two recognized
    ///   values.
    pub fn new(
        token: &str,
        email: &str,
        password: &str,
        reserved: Option<&str>,
        mode: &str,
    ) -> Result<Self> {
        let mode: Mode = mode.parse()?;
        Ok(MosyleClient {
            client: build_api_client(),
            base_url: mode.base_url().to_string(),
            credentials: Credentials::new(token, email, password, reserved, mode),
        })
    }

    /// Constructor that accepts a custom base URL, used by tests to point
    /// at a local mock server instead of the real Mosyle API.
    ///
    /// A trailing slash on `base_url` is trimmed so path joining stays
    /// uniform with the vendor constants.
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Self {
        MosyleClient {
            client: build_api_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// The mode this client was constructed for.
    pub fn mode(&self) -> Mode {
        self.credentials.mode()
    }

    /// Merges the credential fields into a request body.
    ///
    /// Every body gets `accessToken`; Business mode also gets `email` and
    /// `password`. Caller-supplied keys of the same name are overwritten —
    /// the configured credentials always win.
    fn authenticated_body(&self, mut body: Map<String, Value>) -> Map<String, Value> {
        body.insert(
            "accessToken".to_string(),
            Value::String(self.credentials.token().to_string()),
        );
        if self.credentials.mode().sends_account_credentials() {
            body.insert(
                "email".to_string(),
                Value::String(self.credentials.email().to_string()),
            );
            body.insert(
                "password".to_string(),
                Value::String(self.credentials.password().to_string()),
            );
        }
        body
    }

    /// Sends an authenticated JSON POST and classifies the response.
    ///
    /// `path` is relative to the base URL (no leading slash). The body is
    /// the operation-specific payload; credentials are injected here so
    /// the endpoint functions never touch them.
    ///
    /// Classification order:
    /// 1. Send failure → `Transport`.
    /// 2. HTTP 401/403 → `Auth` with the raw body preserved.
    /// 3. HTTP 400/404/422 → `Validation` carrying the decoded error body
    ///    (raw text if it does not decode).
    /// 4. Any other non-success status → `Api`.
    /// 5. Body not valid JSON → `Decode`.
    /// 6. A vendor error envelope (top-level `"status"` other than `"OK"`)
    ///    → `Auth` or `Validation` depending on what it describes.
    /// 7. Otherwise the decoded value is returned unmodified.
    pub(crate) async fn post(&self, path: &str, body: Map<String, Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(mode = %self.mode(), %url, "dispatching Mosyle API request");

        let body = self.authenticated_body(body);
        let response = self.client.post(&url).json(&body).send().await?;

        // Read the body before acting on the status so every branch can
        // surface Mosyle's own diagnostic text.
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(%status, "Mosyle API rejected credentials");
            return Err(MosyleError::Auth {
                status: Some(status),
                body: text,
            });
        }

        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            error!(%status, "Mosyle API rejected request content");
            let payload =
                serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.clone()));
            return Err(MosyleError::Validation { payload });
        }

        if !status.is_success() {
            error!(%status, "Mosyle API request failed");
            return Err(MosyleError::Api { status, body: text });
        }

        let payload: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(source) => {
                error!("Mosyle API response was not valid JSON");
                return Err(MosyleError::Decode { body: text, source });
            }
        };

        if let Some(err) = envelope_error(&payload) {
            error!("Mosyle API reported an error inside a success response");
            return Err(err);
        }

        Ok(payload)
    }
}

/// Inspects a decoded success response for Mosyle's error envelope.
///
/// Mosyle reports some failures inside an HTTP 200: a JSON object whose
/// top-level `"status"` is a string other than `"OK"`. Responses without
/// a `"status"` key (or with a non-string one) are not envelopes and pass
/// through untouched.
///
/// Envelopes describing a credential problem map to `Auth`; everything
/// else maps to `Validation` with the payload carried verbatim.
///
/// Only the envelope's diagnostic fields (`status`, `message`, `error`)
/// are inspected for credential markers. Data elsewhere in the payload
/// may legitimately contain words like "token" or "auth" (device names,
/// column lists) and must not affect classification.
fn envelope_error(payload: &Value) -> Option<MosyleError> {
    let status = payload.get("status")?.as_str()?;
    if status.eq_ignore_ascii_case("ok") {
        return None;
    }

    let diagnostic = ["status", "message", "error"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();
    let credential_problem = ["token", "auth", "credential", "denied"]
        .iter()
        .any(|marker| diagnostic.contains(marker));

    if credential_problem {
        Some(MosyleError::Auth {
            status: None,
            body: payload.to_string(),
        })
    } else {
        Some(MosyleError::Validation {
            payload: payload.clone(),
        })
    }
}
