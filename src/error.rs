//! Typed error hierarchy for the mosyle crate.
//!
//! `MosyleError` is a structured enum that preserves diagnostic context at
//! each failure boundary. Every variant carries enough information for
//! callers to:
//! - Distinguish the failure category (config, transport, auth, decode,
//!   validation, other API failure).
//! - Inspect the original cause via `source()` (thiserror derives this
//!   automatically from `#[source]` fields).
//! - Display a human-readable message that includes the relevant context
//!   (status code, response body, mode string, etc.).
//!
//! Design rationale:
//! - Variants map to real system boundaries. `Config` covers client
//!   construction; `Transport` covers the network below HTTP; `Auth`,
//!   `Validation`, and `Api` cover the Mosyle API's three ways of saying
//!   no; `Decode` covers response bodies that are not JSON.
//! - The client performs no local recovery: every variant is surfaced to
//!   the caller with the vendor's own error content verbatim. `Validation`
//!   in particular carries the decoded error body unmodified, because the
//!   Mosyle error format is vendor-defined and callers may need any part
//!   of it.

use reqwest::StatusCode;

/// Unified error type for all mosyle library operations.
///
/// Each variant corresponds to a distinct failure boundary. The `#[source]`
/// attribute on inner errors enables `Error::source()` chaining so callers
/// (and logging frameworks) can traverse the full cause chain.
#[derive(Debug, thiserror::Error)]
pub enum MosyleError {
    /// Client construction was given an unusable configuration.
    ///
    /// The only construction-time check is the account mode: anything
    /// outside `business` / `school` fails here. No network activity has
    /// occurred when this is returned.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human-readable description of what was rejected, including the
        /// offending value.
        message: String,
    },

    /// A network-level failure occurred (DNS resolution, TCP connection,
    /// TLS handshake, request timeout, etc.).
    ///
    /// No HTTP status code is available because the request did not
    /// complete. This wraps the underlying `reqwest::Error` which carries
    /// detailed transport diagnostics.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Mosyle API rejected the configured credentials.
    ///
    /// Raised for HTTP 401/403 responses, and for 200 responses whose
    /// vendor error envelope describes a credential problem (Mosyle
    /// reports some authentication failures inside a success status).
    /// `status` is `None` in the envelope case.
    #[error("authentication rejected{}: {body}", fmt_status(.status))]
    Auth {
        /// The HTTP status code, when the rejection was signalled by one.
        status: Option<StatusCode>,
        /// The raw response body, preserving Mosyle's own error text.
        body: String,
    },

    /// The response body could not be decoded as JSON despite a success
    /// HTTP status.
    ///
    /// The offending body is preserved so callers can see what the API
    /// actually sent (HTML error pages, empty bodies, truncated output).
    #[error("response was not valid JSON: {source}")]
    Decode {
        /// The raw response body text that failed to decode.
        body: String,
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The Mosyle API rejected the semantic content of the request —
    /// an unknown update field, a device serial that does not exist,
    /// a malformed filter.
    ///
    /// The decoded vendor error body is carried verbatim; the client
    /// never synthesizes its own validation messages.
    #[error("request rejected by the API: {payload}")]
    Validation {
        /// The decoded error response exactly as the API returned it.
        payload: serde_json::Value,
    },

    /// The Mosyle API returned a non-success HTTP status that is neither
    /// an authentication nor a validation failure (e.g. 500, 503).
    ///
    /// The full response body is preserved rather than discarded, since
    /// vendor 5xx bodies often contain the only available diagnostic.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by the Mosyle API.
        status: StatusCode,
        /// The raw response body text. May be an empty string if the body
        /// could not be read.
        body: String,
    },
}

/// Formats the optional status for the `Auth` display message.
/// Produces `" (401 Unauthorized)"` or an empty string.
fn fmt_status(status: &Option<StatusCode>) -> String {
    match status {
        Some(s) => format!(" ({s})"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the library.
/// Keeps function signatures concise while providing the full typed error.
pub type Result<T> = std::result::Result<T, MosyleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_displays_message() {
        let err = MosyleError::Config {
            message: "unknown mode \"district\"".to_string(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("district"),
            "display should include the offending mode"
        );
        assert!(
            msg.contains("invalid configuration"),
            "display should indicate a config failure"
        );
    }

    #[test]
    fn auth_error_with_status_displays_code() {
        let err = MosyleError::Auth {
            status: Some(StatusCode::UNAUTHORIZED),
            body: r#"{"status":"error","message":"Invalid access token"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"), "display should include status code");
        assert!(
            msg.contains("Invalid access token"),
            "display should include the vendor body"
        );
    }

    #[test]
    fn auth_error_without_status_omits_code() {
        // Envelope-signalled auth failures arrive inside a 200 response,
        // so there is no status to show.
        let err = MosyleError::Auth {
            status: None,
            body: "token expired".to_string(),
        };
        let msg = err.to_string();
        assert!(!msg.contains('('), "no status parenthetical expected");
        assert!(msg.contains("token expired"));
    }

    #[test]
    fn decode_error_chains_to_serde() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = MosyleError::Decode {
            body: "<html>".to_string(),
            source,
        };
        assert!(
            err.source().is_some(),
            "Decode variant should chain to serde_json::Error"
        );
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn validation_error_carries_payload_verbatim() {
        let payload = serde_json::json!({
            "status": "error",
            "message": "unknown field: asset_tug"
        });
        let err = MosyleError::Validation {
            payload: payload.clone(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("asset_tug"),
            "display should surface the vendor's own message"
        );
        match err {
            MosyleError::Validation { payload: p } => assert_eq!(p, payload),
            _ => unreachable!(),
        }
    }

    #[test]
    fn api_error_preserves_status_and_body() {
        let err = MosyleError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "backend unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"), "display should include status code");
        assert!(msg.contains("backend unavailable"));
    }

    #[test]
    fn error_is_send_and_sync() {
        // MosyleError must be Send + Sync for use across async task boundaries.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MosyleError>();
    }
}
