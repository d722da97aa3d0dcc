//! API error types for the OnlyOffice client.

use thiserror::Error;

/// Errors that can occur when interacting with the OnlyOffice API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request body or query parameter set could not be encoded.
    ///
    /// Nothing was sent to the server.
    #[error("Failed to encode request: {0}")]
    Serialization(String),

    /// The implicit token exchange failed, so the original request was not sent.
    #[error("Failed to authenticate: {0}")]
    Authentication(#[source] Box<ApiError>),

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid API response: {0}")]
    Decode(String),

    /// The server answered with a non-success status and an undecodable body.
    #[error("OnlyOffice returned HTTP {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The server's error message, or the decode failure if it sent none.
        message: String,
    },

    /// A responsible user was required but the portal listed no user with an ID.
    #[error("No users available to assign as responsible")]
    NoUsers,

    /// The composed request target is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Wrap an error raised while obtaining a token.
    pub fn authentication(cause: ApiError) -> Self {
        ApiError::Authentication(Box::new(cause))
    }

    /// Build the error for a response body that failed to decode.
    ///
    /// When the HTTP status is not a success the server's own error message is
    /// preferred over the serde diagnostic.
    pub fn from_undecodable(status: reqwest::StatusCode, body: &str, cause: &str) -> Self {
        if status.is_success() {
            return ApiError::Decode(cause.to_string());
        }

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| cause.to_string());

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    /// Check whether this error came from the token exchange.
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}
