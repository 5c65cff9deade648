//! Async Rust client library for the Mosyle device-management APIs.
//!
//! Provides a thin, typed binding to the Mosyle Business and Mosyle
//! Manager (schools) REST APIs: list devices, fetch a single device by
//! serial number, and update device attributes. The two API variants
//! share one payload shape and differ only in base URL and whether the
//! account email/password ride along in every request body — a closed
//! [`account::Mode`] resolved once at client construction.
//!
//! The client is a pure conduit: request bodies are built from opaque
//! caller-supplied mappings, responses are returned as raw JSON, and
//! every remote error is surfaced verbatim through the typed
//! [`error::MosyleError`] hierarchy. There are no retries, no caching,
//! and no session state.
//!
//! # Modules
//!
//! - [`account`] — API variant selection and immutable credentials.
//! - [`client`] — Authenticated HTTP wrapper shared by all operations.
//! - [`devices`] — The three device operations (list, get, update).
//! - [`error`] — Typed error hierarchy (`MosyleError`) for all operations.
//!
//! # Quick Start
//!
//! ```ignore
//! use mosyle::client::MosyleClient;
//! use mosyle::devices::{list_devices, update_device};
//! use serde_json::Map;
//!
//! let client = MosyleClient::new("token", "admin@example.com", "pw", None, "business")?;
//! let listing = list_devices(&client, "macos", None).await?;
//!
//! let mut fields = Map::new();
//! fields.insert("asset_tag".into(), "1234".into());
//! let updated = update_device(&client, "macos", "C02XL0GZJGH5", &fields).await?;
//! ```

#![warn(missing_docs)]

pub mod account;
pub mod client;
pub mod devices;
pub mod error;
