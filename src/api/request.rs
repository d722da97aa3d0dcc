//! Request descriptors for the dispatcher.
//!
//! A [`Request`] describes one call before it is sent: path, method, query
//! parameters, body and authentication overrides. Anything that has to be
//! serialized is serialized while the descriptor is built, so a descriptor
//! that exists can always be sent.

use serde::Serialize;

use super::error::{ApiError, Result};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request payload.
///
/// Raw payloads are sent verbatim; the caller is responsible for them being
/// valid JSON if the endpoint expects JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
    /// Raw text, sent as-is.
    Text(String),
    /// A structured value, sent as JSON.
    Json(serde_json::Value),
}

impl Body {
    /// Serialize `value` into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| ApiError::Serialization(format!("request body: {e}")))
    }

    /// The bytes that go on the wire.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Text(text) => Ok(text.into_bytes()),
            Body::Json(value) => serde_json::to_vec(&value)
                .map_err(|e| ApiError::Serialization(format!("request body: {e}"))),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

/// A request to the OnlyOffice API, as handed to [`Client::query`].
///
/// [`Client::query`]: super::Client::query
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Path below the portal URL, e.g. `/api/2.0/project.json`.
    pub path: String,
    pub method: Method,
    /// Encoded query parameters, in field order.
    pub params: Option<Vec<(String, String)>>,
    pub body: Option<Body>,
    /// Sent as `Authorization` instead of the client's cached token.
    pub token: Option<String>,
    /// Skip the implicit token acquisition.
    pub no_auth: bool,
    /// Buffer the whole response before decoding and log it.
    pub debug: bool,
}

impl Request {
    /// A `GET` request for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Encode `params` as query parameters.
    ///
    /// `params` must serialize to a flat map. Every field is sent, including
    /// zero values and empty strings. Sequences repeat the key.
    ///
    /// `None` fields are left out entirely rather than sent as an empty
    /// `key=`. Use a `String` field if the endpoint needs the empty form.
    pub fn params<P: Serialize + ?Sized>(mut self, params: &P) -> Result<Self> {
        self.params = Some(encode_query(params)?);
        Ok(self)
    }

    /// Send `body` as is. Strings and byte vectors are not re-encoded.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(Body::json(value)?);
        Ok(self)
    }

    /// Authorize with `token` instead of the client's cached token.
    ///
    /// The override is sent even together with [`Request::no_auth`].
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Do not obtain or send the cached token.
    pub fn no_auth(mut self) -> Self {
        self.no_auth = true;
        self
    }

    /// Read the whole response and log it before decoding.
    pub fn debug(mut self) -> Self {
        self.debug = true;
        self
    }
}

/// Flatten a serializable value into query pairs.
fn encode_query<P: Serialize + ?Sized>(params: &P) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params)
        .map_err(|e| ApiError::Serialization(format!("query parameters: {e}")))?;

    let serde_json::Value::Object(map) = value else {
        return Err(ApiError::Serialization(
            "query parameters must serialize to a map".to_string(),
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            serde_json::Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar_to_string(&key, item)? {
                        pairs.push((key.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar_to_string(&key, other)? {
                    pairs.push((key, v));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(key: &str, value: serde_json::Value) -> Result<Option<String>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(ApiError::Serialization(
            format!("query parameter '{key}' is not a scalar"),
        )),
    }
}
