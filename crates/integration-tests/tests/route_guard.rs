//! Route guard tests: every navigable path enforces its access requirement.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use uuid::Uuid;

use pokedex_integration_tests::{TestApp, assert_redirects_to, body_text, mocks};

/// Paths that require an authenticated session.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/usuarios",
    "/aleatorios",
    "/capturados",
    "/favoritos",
    "/detalle/pikachu",
    "/admin",
];

#[tokio::test]
async fn anonymous_requests_redirect_to_login() {
    let app = TestApp::spawn().await;

    for path in PROTECTED_PATHS {
        let response = app.get(path, None).await;
        assert_redirects_to(&response, "/login");
    }
}

#[tokio::test]
async fn public_pages_render_without_a_session() {
    let app = TestApp::spawn().await;

    let response = app.get("/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/registro", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn regular_role_is_denied_admin_content() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();
    mocks::password_grant_ok(&app.backend, id, "ash@example.com").await;
    mocks::authenticated_user(&app.backend, id, "ash@example.com").await;
    mocks::role(&app.backend, id, "user").await;

    let cookie = app.login("ash@example.com", "pikachu123").await;
    let response = app.get("/admin", Some(&cookie)).await;

    // No admin content is rendered for a non-admin role, only a redirect.
    assert_redirects_to(&response, "/login");
    let body = body_text(response).await;
    assert!(!body.contains("Gestión de Usuarios"));
}

#[tokio::test]
async fn stale_token_is_denied_admin_content() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();
    mocks::password_grant_ok(&app.backend, id, "oak@example.com").await;
    mocks::role(&app.backend, id, "admin").await;
    // The backend no longer recognizes the token when /admin is requested.
    mocks::authenticated_user_rejected(&app.backend).await;

    let cookie = app.login("oak@example.com", "squirtle99x").await;
    let response = app.get("/admin", Some(&cookie)).await;

    assert_redirects_to(&response, "/login");
}

#[tokio::test]
async fn admin_menu_link_follows_session_role() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();
    mocks::password_grant_ok(&app.backend, id, "ash@example.com").await;
    mocks::role(&app.backend, id, "user").await;
    mocks::table(&app.backend, "pokemon", mocks::POKEMON_COLUMNS, serde_json::json!([])).await;

    let cookie = app.login("ash@example.com", "pikachu123").await;
    let response = app.get("/", Some(&cookie)).await;
    let body = body_text(response).await;

    // Fixed links render for every authenticated session...
    assert!(body.contains("href=\"/capturados\""));
    assert!(body.contains("href=\"/favoritos\""));
    // ...but the administrator link only for the admin role.
    assert!(!body.contains("href=\"/admin\""));
}

#[tokio::test]
async fn admin_menu_link_renders_for_admin_role() {
    let app = TestApp::spawn().await;
    let id = Uuid::new_v4();
    mocks::password_grant_ok(&app.backend, id, "oak@example.com").await;
    mocks::role(&app.backend, id, "admin").await;
    mocks::table(&app.backend, "pokemon", mocks::POKEMON_COLUMNS, serde_json::json!([])).await;

    let cookie = app.login("oak@example.com", "squirtle99x").await;
    let response = app.get("/", Some(&cookie)).await;
    let body = body_text(response).await;

    assert!(body.contains("href=\"/admin\""));
}
