//! OnlyOffice API client implementation.
//!
//! This module provides the blocking client and its generic request
//! dispatcher. Every domain operation builds a [`Request`] and hands it to
//! [`Client::query`], which takes care of the token, the HTTP exchange and
//! decoding the JSON envelope.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::auth::{Credentials, Token};
use super::error::{ApiError, Result};
use super::request::{Method, Request};
use super::types::Envelope;

/// Path of the token exchange.
pub const AUTH_PATH: &str = "/api/2.0/authentication.json";

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    credentials: Credentials,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Limit every HTTP exchange to `timeout`. Without it the transport
    /// default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client. No request is made and the URL is not checked yet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP transport cannot be
    /// initialized (e.g. the TLS backend fails to load).
    pub fn build(self) -> Result<Client> {
        let mut http = HttpClient::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(ApiError::Network)?;

        Ok(Client {
            http,
            base_url: normalize_base_url(&self.credentials.url),
            credentials: self.credentials,
            timeout: self.timeout,
            token: Mutex::new(None),
        })
    }
}

/// The OnlyOffice API client.
///
/// Logs in lazily: the first authenticated request, and the first one after
/// the cached token expires, trades the credentials for a new token. The
/// check-and-refresh sequence runs under a lock, so a client can be shared
/// between threads.
#[derive(Debug)]
pub struct Client {
    /// The HTTP client.
    http: HttpClient,
    /// The portal URL without trailing slashes.
    base_url: String,
    credentials: Credentials,
    timeout: Option<Duration>,
    /// The single cached token.
    token: Mutex<Option<Token>>,
}

impl Client {
    /// Create a client with default transport settings.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Portal URL and login used for every token exchange
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP transport cannot be
    /// initialized.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Start configuring a client, e.g. with a request timeout.
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            credentials,
            timeout: None,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credentials used when a token has to be obtained.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The per-request timeout, if one was configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// A copy of the cached token, if any.
    pub fn token(&self) -> Option<Token> {
        self.lock_token().clone()
    }

    /// Replace the cached token, e.g. with one kept from an earlier session.
    pub fn set_token(&self, token: Token) {
        *self.lock_token() = Some(token);
    }

    /// Exchange `credentials` for a token.
    ///
    /// The token is returned, not cached; use [`Client::refresh_token`] for
    /// that.
    #[instrument(skip(self, credentials), fields(user = %credentials.user))]
    pub fn auth(&self, credentials: &Credentials) -> Result<Token> {
        let request = Request::new(AUTH_PATH)
            .method(Method::Post)
            .json(credentials)?
            .no_auth();

        let token = self.query::<Envelope<Token>>(request)?.into_inner();
        info!(expires = %token.expires, "Obtained API token");
        Ok(token)
    }

    /// Log in with the client's own credentials and cache the new token.
    pub fn refresh_token(&self) -> Result<Token> {
        let mut cached = self.lock_token();
        self.refresh_locked(&mut cached)
    }

    /// Send `request` and decode the response body into `T`.
    ///
    /// - The method defaults to `GET`.
    /// - Unless `no_auth` is set, a token is obtained first if none is cached
    ///   or the cached one has expired. If that fails the request is not sent.
    /// - An explicit `token` on the request wins over the cached one.
    /// - Transport failures are returned as they are; nothing is retried.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    pub fn query<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let debug_body = request.debug;
        let response = self.send(request)?;
        decode(response, debug_body)
    }

    /// Send `request` and discard the response body.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), path = %request.path))]
    pub fn execute(&self, request: Request) -> Result<()> {
        let mut response = self.send(request)?;
        if let Err(e) = io::copy(&mut response, &mut io::sink()) {
            debug!("Failed to drain response body: {}", e);
        }
        Ok(())
    }

    /// Build and perform the HTTP exchange for `request`.
    fn send(&self, request: Request) -> Result<Response> {
        let target = format!("{}{}", self.base_url, request.path);
        let url = Url::parse(&target).map_err(|e| ApiError::InvalidUrl(format!("{target}: {e}")))?;

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::PRAGMA, "no-cache");

        if let Some(params) = &request.params {
            builder = builder.query(params);
        }

        if let Some(body) = request.body {
            builder = builder.body(body.into_bytes()?);
        }

        let cached = if request.no_auth {
            None
        } else {
            Some(self.valid_token()?)
        };

        if let Some(value) = request.token.or_else(|| cached.map(|t| t.value)) {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        debug!(url = %target, "Sending request");
        let response = builder.send().map_err(|e| {
            warn!("Request to {} failed: {}", target, e);
            ApiError::Network(e)
        })?;
        debug!(status = response.status().as_u16(), "Received response");
        Ok(response)
    }

    /// The cached token, refreshed first if it is missing or expired.
    fn valid_token(&self) -> Result<Token> {
        let mut cached = self.lock_token();
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.clone());
        }
        self.refresh_locked(&mut cached)
            .map_err(ApiError::authentication)
    }

    /// Obtain and store a new token while holding the cache lock.
    ///
    /// The previous token is dropped before the exchange, so a failed refresh
    /// leaves the cache empty.
    fn refresh_locked(&self, cached: &mut MutexGuard<'_, Option<Token>>) -> Result<Token> {
        if cached.take().is_some() {
            info!("Discarding cached API token");
        }
        let token = self.auth(&self.credentials)?;
        **cached = Some(token.clone());
        Ok(token)
    }

    fn lock_token(&self) -> MutexGuard<'_, Option<Token>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decode the response body as JSON.
///
/// Successful responses are decoded straight from the stream. Error responses
/// are always read completely so a failed decode can report the server's own
/// message; with `buffered` set every body is read first and logged.
fn decode<T: DeserializeOwned>(response: Response, buffered: bool) -> Result<T> {
    let status = response.status();

    if buffered || !status.is_success() {
        let body = response.text()?;
        if buffered {
            debug!(status = status.as_u16(), body = %body, "Response body");
        }
        return serde_json::from_str(&body)
            .map_err(|e| ApiError::from_undecodable(status, &body, &e.to_string()));
    }

    serde_json::from_reader(response).map_err(|e| {
        if e.is_io() {
            warn!("Failed to read response body: {}", e);
        }
        ApiError::Decode(e.to_string())
    })
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
