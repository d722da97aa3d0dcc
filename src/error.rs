//! Centralized error types for the `onlyoffice` command-line tool.
//!
//! Library callers deal with [`ApiError`] directly; the binary folds every
//! failure into [`AppError`] to print a short message and a hint.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (writing output, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
            },
            AppError::Api(e) => match e {
                ApiError::Authentication(cause) => {
                    format!("Could not log in to OnlyOffice: {}", cause)
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check the portal URL and your network.".to_string()
                }
                ApiError::InvalidUrl(_) => "Invalid OnlyOffice URL in configuration.".to_string(),
                ApiError::Status { status, message } => {
                    format!("OnlyOffice rejected the request (HTTP {}): {}", status, message)
                }
                ApiError::Decode(_) => {
                    "Unexpected response from OnlyOffice. Please try again.".to_string()
                }
                ApiError::NoUsers => {
                    "The portal has no users to assign as responsible.".to_string()
                }
                ApiError::Serialization(msg) => format!("Could not encode the request: {}", msg),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_)) => {
                Some("Fix or remove the settings file shown by 'onlyoffice config'.")
            }
            AppError::Api(ApiError::Authentication(_)) => {
                Some("Check ONLYOFFICE_USER and ONLYOFFICE_PASS, or the settings file.")
            }
            AppError::Api(ApiError::InvalidUrl(_)) | AppError::Api(ApiError::Network(_)) => {
                Some("Check ONLYOFFICE_URL, e.g. https://office.example.com")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
