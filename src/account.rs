//! Account mode and credential handling for the Mosyle APIs.
//!
//! Mosyle operates two API variants that share one payload shape:
//! Business (`businessapi.mosyle.com`) and Manager, used by schools
//! (`managerapi.mosyle.com`). [`Mode`] selects between them once, at
//! client construction; it fixes the base URL and whether the account
//! email and password are embedded in every request body.
//!
//! Credentials are immutable after construction and carry no session
//! state: Mosyle authenticates every request from the body itself, so
//! there is no token cache to refresh or invalidate.

use std::fmt;
use std::str::FromStr;

use crate::error::MosyleError;

/// Base URL for the Mosyle Business API.
const BUSINESS_BASE_URL: &str = "https://businessapi.mosyle.com/v1";

/// Base URL for the Mosyle Manager (schools) API.
const SCHOOL_BASE_URL: &str = "https://managerapi.mosyle.com/v2";

/// Selects which Mosyle API variant a client targets.
///
/// The mode is resolved once at construction and fixes two things for the
/// lifetime of the client:
/// - the base endpoint URL, and
/// - the request-body shape: Business embeds the account email and
///   password in every body, Manager sends the access token only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mosyle Business (`businessapi.mosyle.com/v1`).
    Business,
    /// Mosyle Manager, the schools product (`managerapi.mosyle.com/v2`).
    School,
}

impl Mode {
    /// Returns the vendor base URL for this mode, without a trailing slash.
    pub fn base_url(&self) -> &'static str {
        match self {
            Mode::Business => BUSINESS_BASE_URL,
            Mode::School => SCHOOL_BASE_URL,
        }
    }

    /// Returns the canonical lowercase mode string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Business => "business",
            Mode::School => "school",
        }
    }

    /// True when this mode embeds email/password in every request body.
    pub(crate) fn sends_account_credentials(&self) -> bool {
        matches!(self, Mode::Business)
    }
}

impl FromStr for Mode {
    type Err = MosyleError;

    /// Parses a mode string. Matching is ASCII case-insensitive
    /// (`"Business"` and `"business"` are equivalent); anything outside
    /// the two recognized values is a `Config` error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("business") {
            Ok(Mode::Business)
        } else if s.eq_ignore_ascii_case("school") {
            Ok(Mode::School)
        } else {
            Err(MosyleError::Config {
                message: format!("unknown mode {s:?}, expected \"business\" or \"school\""),
            })
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable credential set owned by a client for its lifetime.
///
/// Invariants:
/// - Constructed once, never mutated; there is no session or refresh state.
/// - `reserved` is stored verbatim and never serialized to the wire. It
///   exists for call-site compatibility with older Mosyle bindings that
///   accepted a fifth positional parameter.
pub struct Credentials {
    token: String,
    email: String,
    password: String,
    reserved: Option<String>,
    mode: Mode,
}

impl Credentials {
    /// Stores the given fields verbatim. No validation beyond the mode,
    /// which the caller has already parsed; the remote API is the sole
    /// judge of whether the token and account are valid.
    pub fn new(
        token: &str,
        email: &str,
        password: &str,
        reserved: Option<&str>,
        mode: Mode,
    ) -> Self {
        Credentials {
            token: token.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            reserved: reserved.map(str::to_string),
            mode,
        }
    }

    /// The Mosyle integration access token, sent in every request body.
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// The admin account email. Only sent on the wire in Business mode.
    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    /// The admin account password. Only sent on the wire in Business mode.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// The mode this credential set was constructed for.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The reserved field, held but never transmitted.
    pub fn reserved(&self) -> Option<&str> {
        self.reserved.as_deref()
    }
}
