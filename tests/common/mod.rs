//! In-process mock OnlyOffice portal.
//!
//! Serves the authentication endpoint plus whatever canned routes a test
//! registers, and records every request it sees. The server runs on a random
//! port in a background thread with its own tokio runtime, so tests can drive
//! the blocking client from the test thread.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use onlyoffice::{Client, Credentials};

pub const AUTH_PATH: &str = "/api/2.0/authentication.json";
pub const USER: &str = "a@b.com";
pub const PASSWORD: &str = "x";
pub const FAR_FUTURE: &str = "2099-01-01T00:00:00.0000000+00:00";

/// A request as seen by the mock portal.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    pub fn is_auth(&self) -> bool {
        self.path == AUTH_PATH
    }
}

#[derive(Default)]
struct PortalState {
    requests: Vec<Recorded>,
    tokens: Vec<(String, String)>,
    issued: usize,
    reject_auth: bool,
    routes: HashMap<(String, String), (u16, String)>,
    delays: HashMap<(String, String), Duration>,
}

type Shared = Arc<Mutex<PortalState>>;

/// Handle to a running mock portal.
pub struct MockPortal {
    pub url: String,
    state: Shared,
}

impl MockPortal {
    /// Start a portal that issues tokens `T1`, `T2`, ... expiring in 2099.
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(PortalState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                axum::serve(listener, app).await
            })
            .unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Queue a token for the next authentication exchange.
    pub fn issue_token(&self, value: &str, expires: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .tokens
            .push((value.to_string(), expires.to_string()));
        self
    }

    /// Answer every authentication exchange with 401.
    pub fn reject_auth(&self) -> &Self {
        self.state.lock().unwrap().reject_auth = true;
        self
    }

    /// Answer `method path` with `status` and the raw `body`.
    pub fn route(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Hold the answer to `method path` back for `delay`.
    pub fn delay(&self, method: &str, path: &str, delay: Duration) -> &Self {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert((method.to_string(), path.to_string()), delay);
        self
    }

    /// Answer `method path` with 200 and `payload` wrapped in an envelope.
    pub fn respond(&self, method: &str, path: &str, payload: serde_json::Value) -> &Self {
        let body = envelope(payload).to_string();
        self.route(method, path, 200, &body)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests other than the authentication exchange.
    pub fn api_requests(&self) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| !r.is_auth()).collect()
    }

    pub fn auth_count(&self) -> usize {
        self.requests().iter().filter(|r| r.is_auth()).count()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.url.clone(), USER, PASSWORD)
    }

    pub fn client(&self) -> Client {
        Client::new(self.credentials()).unwrap()
    }
}

pub fn envelope(payload: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "count": payload.as_array().map_or(1, |a| a.len()),
        "total": payload.as_array().map_or(1, |a| a.len()),
        "status": 0,
        "statusCode": 200,
        "response": payload,
    })
}

fn error_body(status: u16, message: &str) -> String {
    serde_json::json!({
        "status": 1,
        "statusCode": status,
        "error": {"message": message},
    })
    .to_string()
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    };

    let key = (recorded.method.clone(), recorded.path.clone());
    let (status, body, delay) = {
        let mut state = state.lock().unwrap();
        state.requests.push(recorded.clone());

        let (status, body) = if recorded.is_auth() {
            authenticate(&mut state, &recorded)
        } else {
            state
                .routes
                .get(&key)
                .cloned()
                .unwrap_or_else(|| (404, error_body(404, "Not found")))
        };
        (status, body, state.delays.get(&key).copied())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

fn authenticate(state: &mut PortalState, request: &Recorded) -> (u16, String) {
    let credentials: serde_json::Value =
        serde_json::from_slice(&request.body).unwrap_or(serde_json::Value::Null);
    let valid = credentials["userName"] == USER && credentials["password"] == PASSWORD;
    if state.reject_auth || !valid {
        return (401, error_body(401, "Invalid username or password."));
    }

    state.issued += 1;
    let (token, expires) = if state.tokens.is_empty() {
        (format!("T{}", state.issued), FAR_FUTURE.to_string())
    } else {
        state.tokens.remove(0)
    };

    let body = envelope(serde_json::json!({"token": token, "expires": expires}));
    (201, body.to_string())
}
