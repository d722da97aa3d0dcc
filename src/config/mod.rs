//! Configuration management for the OnlyOffice client.
//!
//! Connection details come from an optional TOML settings file, overridden by
//! the `ONLYOFFICE_*` environment variables.

mod settings;

pub use settings::Settings;

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// The settings file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The settings file is not valid TOML or has unexpected fields.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
