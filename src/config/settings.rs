//! Settings file handling.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::api::{Client, Credentials, ENV_PASSWORD, ENV_URL, ENV_USER};

/// Directory below the platform configuration directory.
const APP_DIR: &str = "onlyoffice";

/// File name of the settings file.
const CONFIG_FILE: &str = "config.toml";

/// Connection settings read from `config.toml`.
///
/// Every field is optional; the matching environment variable takes
/// precedence when it is set and non-empty.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// The portal URL.
    pub url: Option<String>,
    /// The login name.
    pub user: Option<String>,
    /// The password.
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// The settings file location, e.g. `~/.config/onlyoffice/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the settings file from its default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Resolve the credentials, environment variables first.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            resolve(ENV_URL, self.url.as_deref()),
            resolve(ENV_USER, self.user.as_deref()),
            resolve(ENV_PASSWORD, self.password.as_deref()),
        )
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build a client from the resolved credentials and the timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialized.
    pub fn client(&self) -> crate::api::Result<Client> {
        let mut builder = Client::builder(self.credentials());
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

fn resolve(var: &str, fallback: Option<&str>) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_default()
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
