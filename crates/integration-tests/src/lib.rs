//! Integration tests for Bihar Bhojan.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bihar-bhojan-integration-tests
//! ```
//!
//! The tests drive the full storefront router in process. Bookings live in
//! memory, sessions in a `MemoryStore`, and emails land in an [`Outbox`], so
//! no database or network is needed.
//!
//! # Test Categories
//!
//! - `ordering` - Menu, cart and WhatsApp checkout
//! - `bookings` - Booking submission and admin handling
//! - `menu_admin` - Menu editing through the admin API

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use bihar_bhojan_storefront::config::{EmailConfig, RestaurantConfig, StorefrontConfig};
use bihar_bhojan_storefront::middleware::session_layer;
use bihar_bhojan_storefront::routes;
use bihar_bhojan_storefront::services::{MailTransport, Outbox};
use bihar_bhojan_storefront::state::AppState;

/// Admin password configured for every test app.
pub const ADMIN_PASSWORD: &str = "tandoori-nights";

/// The sample menu shipped in `data/menu.json`.
pub const SAMPLE_MENU: &str = include_str!("../../../data/menu.json");

/// Client address sent on every request, for the rate limiter.
const CLIENT_IP: &str = "198.51.100.24";

/// Configuration pointing at `menu_path`, with no database, no Resend key
/// and a plain-http base URL.
#[must_use]
pub fn test_config(menu_path: PathBuf) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/bihar_bhojan_test".to_owned()),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("Zq8vN3kR7wT1yU5pL9mB2xC6hF4jD0gA".to_owned()),
        admin_password: Some(SecretString::from(ADMIN_PASSWORD.to_owned())),
        restaurant: RestaurantConfig::default(),
        email: EmailConfig {
            from: "bookings@biharbhojan.com".to_owned(),
            resend_api_key: None,
        },
        menu_path,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A parsed response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a successful response.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` field of a failed response.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}

/// One browser talking to a fresh storefront.
///
/// Cookies set by responses are replayed on later requests, so the cart
/// session and the admin login carry over between calls.
pub struct TestApp {
    router: Router,
    outbox: Outbox,
    menu_path: PathBuf,
    cookies: BTreeMap<String, String>,
}

impl TestApp {
    /// Start an app serving [`SAMPLE_MENU`].
    ///
    /// # Panics
    ///
    /// Panics if the temporary menu file cannot be written.
    pub async fn new() -> Self {
        Self::with_menu(SAMPLE_MENU).await
    }

    /// Start an app whose menu file holds `menu_json`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary menu file cannot be written.
    pub async fn with_menu(menu_json: &str) -> Self {
        let menu_path =
            std::env::temp_dir().join(format!("bb-it-menu-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&menu_path, menu_json)
            .await
            .expect("write temporary menu file");

        let outbox = Outbox::new();
        let state = AppState::in_memory(
            test_config(menu_path.clone()),
            MailTransport::Memory(outbox.clone()),
        );
        let router = routes::routes()
            .layer(session_layer(MemoryStore::default(), false))
            .with_state(state);

        Self {
            router,
            outbox,
            menu_path,
            cookies: BTreeMap::new(),
        }
    }

    /// Emails sent so far.
    #[must_use]
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Path of this app's menu file.
    #[must_use]
    pub fn menu_path(&self) -> &std::path::Path {
        &self.menu_path
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    pub async fn post(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    pub async fn put(&mut self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    /// Forget every cookie, as if a new visitor arrived. Returns the old jar.
    pub fn take_cookies(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.cookies)
    }

    /// Put back a jar returned by [`TestApp::take_cookies`].
    pub fn restore_cookies(&mut self, cookies: BTreeMap<String, String>) {
        self.cookies = cookies;
    }

    /// Log in with [`ADMIN_PASSWORD`].
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login_admin(&mut self) {
        let response = self
            .post("/admin/login", &serde_json::json!({ "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "admin login failed: {response:?}");
    }

    async fn request(&mut self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", CLIENT_IP);

        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            if let Ok(raw) = set_cookie.to_str() {
                self.store_cookie(raw);
            }
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    fn store_cookie(&mut self, raw: &str) {
        let mut parts = raw.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let expired = parts.any(|attr| attr.eq_ignore_ascii_case("Max-Age=0"));
        if expired || value.is_empty() {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_owned(), value.to_owned());
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.menu_path);
    }
}
