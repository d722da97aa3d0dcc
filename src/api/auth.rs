//! Authentication handling for the OnlyOffice API.
//!
//! OnlyOffice trades a username/password pair for a short-lived token at
//! `POST /api/2.0/authentication.json`. The token is then sent verbatim in the
//! `Authorization` header, without a `Bearer ` prefix.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::time::ApiTime;

/// Environment variable holding the portal URL.
pub const ENV_URL: &str = "ONLYOFFICE_URL";
/// Environment variable holding the user name (usually an email address).
pub const ENV_USER: &str = "ONLYOFFICE_USER";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "ONLYOFFICE_PASS";

/// Login credentials for an OnlyOffice portal.
///
/// Serializes as the body of the authentication request; the URL is only used
/// to compose request targets and is never sent.
#[derive(Clone, Default, Serialize, PartialEq, Eq)]
pub struct Credentials {
    /// The portal base URL, e.g. `https://office.example.com`.
    #[serde(skip)]
    pub url: String,
    /// The login name.
    #[serde(rename = "userName")]
    pub user: String,
    /// The password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from explicit values.
    ///
    /// Nothing is validated here. An empty URL fails later, at request time.
    pub fn new(url: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Read credentials from `ONLYOFFICE_URL`, `ONLYOFFICE_USER` and
    /// `ONLYOFFICE_PASS`. Unset variables become empty strings.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ENV_URL).unwrap_or_default(),
            std::env::var(ENV_USER).unwrap_or_default(),
            std::env::var(ENV_PASSWORD).unwrap_or_default(),
        )
    }

    /// The authentication request body.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A bearer token issued by the authentication endpoint.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The opaque token value.
    #[serde(rename = "token")]
    pub value: String,
    /// When the server stops accepting the token.
    pub expires: ApiTime,
}

impl Token {
    /// A token with a known value and expiry, e.g. one kept from an earlier
    /// session and handed to [`Client::set_token`].
    ///
    /// [`Client::set_token`]: super::Client::set_token
    pub fn new(value: impl Into<String>, expires: impl Into<ApiTime>) -> Self {
        Self {
            value: value.into(),
            expires: expires.into(),
        }
    }

    /// Whether the token is no longer valid at `now`.
    pub fn is_expired_at(&self, now: &ApiTime) -> bool {
        !self.expires.after(now)
    }

    /// Whether the token is no longer valid.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(&ApiTime::now())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires", &self.expires.to_string())
            .finish()
    }
}
