// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: an in-process mock of the NGO backend.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use ngo_console::config::Config;
use ngo_console::db::SessionStore;
use ngo_console::models::{AllocatedDistrict, Role, Session};
use ngo_console::NgoApi;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const REFRESH_PATH: &str = "/api/token/refresh/";
pub const INITIAL_ACCESS: &str = "access-0";
pub const INITIAL_REFRESH: &str = "refresh-0";

/// Canned response for one route.
#[derive(Clone, Debug)]
pub struct Route {
    pub status: u16,
    pub body: Value,
    /// Require a valid bearer token
    pub auth: bool,
    /// Answer 401 whatever the token
    pub always_unauthorized: bool,
    pub delay: Duration,
}

impl Route {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            auth: true,
            always_unauthorized: false,
            delay: Duration::ZERO,
        }
    }

    pub fn public(body: Value) -> Self {
        Self {
            auth: false,
            ..Self::ok(body)
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }

    pub fn always_401() -> Self {
        Self {
            always_unauthorized: true,
            ..Self::status(401, json!({"detail": "Given token not valid for any token type"}))
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// How the refresh endpoint behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    /// Issue `{access}`
    Issue,
    /// Issue `{access, refresh}`
    Rotate,
    /// Issue `{success, data: {access_token}}`
    Enveloped,
    /// Reject with 401
    Fail,
}

/// One request as the backend saw it.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct MockState {
    routes: Mutex<HashMap<String, Route>>,
    valid_tokens: Mutex<HashSet<String>>,
    refresh_mode: Mutex<RefreshMode>,
    refresh_delay: Mutex<Duration>,
    issued: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

fn route_key(method: &str, path_and_query: &str) -> String {
    format!("{} {}", method.to_uppercase(), path_and_query)
}

impl MockBackend {
    /// Start a backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            routes: Mutex::new(HashMap::new()),
            valid_tokens: Mutex::new(HashSet::from([INITIAL_ACCESS.to_string()])),
            refresh_mode: Mutex::new(RefreshMode::Issue),
            refresh_delay: Mutex::new(Duration::ZERO),
            issued: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Configure a route. `path` may include a query string to match it
    /// exactly; otherwise the route matches any query.
    pub fn on(&self, method: &str, path: &str, route: Route) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(route_key(method, path), route);
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self.state.refresh_mode.lock().unwrap() = mode;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.state.refresh_delay.lock().unwrap() = delay;
    }

    /// Invalidate every access token issued so far.
    pub fn expire_tokens(&self) {
        self.state.valid_tokens.lock().unwrap().clear();
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests to `path` (query ignored) with `method`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn refresh_hits(&self) -> usize {
        self.hits("POST", REFRESH_PATH)
    }

    pub fn config(&self) -> Config {
        Config::for_base_url(&self.base_url)
    }

    /// Client with an empty in-memory session store.
    pub async fn api(&self) -> NgoApi {
        self.api_with_store(SessionStore::new_mock()).await
    }

    pub async fn api_with_store(&self, store: SessionStore) -> NgoApi {
        NgoApi::connect(&self.config(), store)
            .await
            .expect("connect to mock backend")
    }

    /// Client already logged in with `session`.
    pub async fn logged_in(&self, session: &Session) -> NgoApi {
        let store = SessionStore::new_mock();
        store.save(session).await.expect("seed session");
        self.api_with_store(store).await
    }
}

/// A session holding the initial tokens.
pub fn session(role: Role, district: Option<AllocatedDistrict>) -> Session {
    Session {
        access_token: INITIAL_ACCESS.to_string(),
        refresh_token: INITIAL_REFRESH.to_string(),
        role,
        unique_id: match role {
            Role::Admin => "ADM-1",
            Role::DistrictAdmin => "DA1",
            Role::RegionAdmin => "RA1",
            Role::Member => "MEM-1",
        }
        .to_string(),
        allocated_district: district,
        profile: Default::default(),
    }
}

pub fn admin_session() -> Session {
    session(Role::Admin, None)
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    };
    state.requests.lock().unwrap().push(recorded.clone());

    if method == Method::POST && uri.path() == REFRESH_PATH {
        return refresh(&state, &recorded).await;
    }

    let full = match uri.query() {
        Some(q) => route_key(method.as_str(), &format!("{}?{}", uri.path(), q)),
        None => route_key(method.as_str(), uri.path()),
    };
    let route = {
        let routes = state.routes.lock().unwrap();
        routes
            .get(&full)
            .or_else(|| routes.get(&route_key(method.as_str(), uri.path())))
            .cloned()
    };
    let Some(route) = route else {
        return (StatusCode::NOT_FOUND, "<h1>Not Found</h1>").into_response();
    };

    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    if route.always_unauthorized {
        return json_response(401, route.body);
    }

    if route.auth {
        let token = recorded
            .authorization
            .as_deref()
            .and_then(|v| v.strip_prefix("Bearer "));
        let valid = token.is_some_and(|t| state.valid_tokens.lock().unwrap().contains(t));
        if !valid {
            return json_response(
                401,
                json!({"detail": "Given token not valid for any token type"}),
            );
        }
    }

    json_response(route.status, route.body)
}

async fn refresh(state: &MockState, recorded: &Recorded) -> Response {
    let delay = *state.refresh_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if recorded.json().get("refresh").and_then(Value::as_str).is_none() {
        return json_response(400, json!({"refresh": ["This field is required."]}));
    }

    let mode = *state.refresh_mode.lock().unwrap();
    if mode == RefreshMode::Fail {
        return json_response(
            401,
            json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
        );
    }

    let n = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
    let access = format!("access-{}", n);
    state.valid_tokens.lock().unwrap().insert(access.clone());

    let body = match mode {
        RefreshMode::Issue => json!({ "access": access }),
        RefreshMode::Rotate => json!({ "access": access, "refresh": format!("refresh-{}", n) }),
        RefreshMode::Enveloped => json!({ "success": true, "data": { "access_token": access } }),
        RefreshMode::Fail => unreachable!(),
    };
    json_response(200, body)
}

fn json_response(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(body)).into_response()
}
