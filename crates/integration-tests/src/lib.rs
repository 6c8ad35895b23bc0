//! Integration tests for the Pokédex site.
//!
//! The router is driven in-process via `tower::ServiceExt::oneshot`; the
//! hosted backend (GoTrue + PostgREST) is mocked with `wiremock`. Session
//! cookies are carried between requests by hand, so full login flows run
//! without a real browser or network.
//!
//! # Test Categories
//!
//! - `route_guard` - Access requirements per navigable path
//! - `auth_flow` - Login, registration, and logout
//! - `admin_panel` - Joined view rendering and mutations

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::MockServer;

use pokedex_site::config::{SiteConfig, SupabaseConfig};
use pokedex_site::state::AppState;

pub mod mocks;

/// The application under test plus its mocked backend.
pub struct TestApp {
    pub router: Router,
    pub backend: MockServer,
}

impl TestApp {
    /// Start a mocked backend and build the router against it.
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let config = test_config(&backend.uri());
        let state = AppState::new(config);
        let router = pokedex_site::app(state);
        Self { router, backend }
    }

    /// Issue a GET request, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Issue a form POST, optionally with a session cookie.
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log in through the real login route and return the session cookie.
    ///
    /// The matching password-grant and role mocks must be mounted first.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = format!("email={email}&password={password}");
        let response = self.post_form("/login", &body, None).await;
        assert_redirects_to(&response, "/");
        session_cookie(&response).expect("session cookie set on login")
    }
}

/// Configuration pointing at the mocked backend.
#[must_use]
pub fn test_config(backend_url: &str) -> SiteConfig {
    SiteConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        supabase: SupabaseConfig {
            project_url: backend_url.trim_end_matches('/').to_string(),
            anon_key: "test-anon-key".to_string(),
            service_key: SecretString::from("test-service-key"),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Extract the session cookie (name=value) from a response.
#[must_use]
pub fn session_cookie(response: &Response) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|s| s.trim().to_string())
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}

/// Assert that a response redirects to the given path.
pub fn assert_redirects_to(response: &Response, path: &str) {
    assert!(
        response.status().is_redirection(),
        "expected a redirect, got {}",
        response.status()
    );
    assert_eq!(location(response), Some(path));
}

/// Collect the response body as UTF-8 text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
