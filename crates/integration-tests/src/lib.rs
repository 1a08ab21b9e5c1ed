//! Integration test harness for Oakline.
//!
//! Builds the full application router against a throwaway data
//! directory and drives it in-process with `tower::ServiceExt::oneshot`,
//! so tests exercise the real middleware stack (sessions included)
//! without binding a socket.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::new();
//! let response = app.post("/auth/register", None, json!({ ... })).await;
//! assert_eq!(response.status, StatusCode::CREATED);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Map, Value, json};
use tower::ServiceExt;

use oakline_server::catalog::FurnitureFactory;
use oakline_server::config::ServerConfig;
use oakline_server::state::AppState;
use oakline_server::store::InventoryStore;

/// One application instance over a temporary data directory.
pub struct TestApp {
    _dir: tempfile::TempDir,
    router: Router,
}

/// A decoded response: status, session cookie (if set) and JSON body.
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    /// Build an app over an empty data directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ServerConfig::for_tests(dir.path());
        let state = AppState::new(config).expect("app state");
        let router = oakline_server::app(state);
        Self { _dir: dir, router }
    }

    /// Build an app whose inventory already stocks `quantity` Office
    /// Chairs at $120.00.
    #[must_use]
    pub fn with_office_chairs(quantity: u32) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");

        let factory = FurnitureFactory::new();
        let item = factory
            .create("Chair", &office_chair_attrs(quantity))
            .expect("seed item");
        let mut inventory =
            InventoryStore::open(dir.path().join("inventory.json")).expect("inventory");
        inventory.add(item).expect("seed add");
        inventory.flush().expect("seed flush");

        let config = ServerConfig::for_tests(dir.path());
        let state = AppState::new(config).expect("app state");
        let router = oakline_server::app(state);
        Self { _dir: dir, router }
    }

    /// Send a request and decode the response.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            set_cookie,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request("GET", uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request("POST", uri, cookie, Some(body)).await
    }

    pub async fn put(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request("PUT", uri, cookie, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request("DELETE", uri, cookie, Some(body)).await
    }

    /// Register a client account and log in, returning the session
    /// cookie.
    pub async fn login_client(&self, username: &str) -> String {
        let response = self
            .post(
                "/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "hunter2hunter2",
                    "address": "12 Elm St",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.login(username).await
    }

    /// Register a management account and log in, returning the session
    /// cookie.
    pub async fn login_management(&self, username: &str) -> String {
        let response = self
            .post(
                "/auth/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "hunter2hunter2",
                    "address": "HQ",
                    "role": "management",
                    "title": "Store Manager",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.login(username).await
    }

    /// Log an existing user in and return the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post(
                "/auth/login",
                None,
                json!({ "username": username, "password": "hunter2hunter2" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.set_cookie.expect("session cookie")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute mapping for the standard test chair.
#[must_use]
pub fn office_chair_attrs(quantity: u32) -> Map<String, Value> {
    json!({
        "name": "Office Chair",
        "description": "Ergonomic swivel chair with lumbar support",
        "price": "120.00",
        "dimensions": "60x60x110 cm",
        "serial_number": "CH-1001",
        "quantity": quantity,
        "weight": "12.5",
        "manufacturing_country": "Denmark",
        "has_wheels": true,
        "leg_count": 5,
    })
    .as_object()
    .cloned()
    .expect("object")
}
