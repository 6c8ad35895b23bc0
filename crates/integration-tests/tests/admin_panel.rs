//! Administration panel: joined view rendering and mutations.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use pokedex_integration_tests::{TestApp, body_text, mocks};

/// Admin identity plus the session cookie obtained through the login route.
struct AdminSession {
    app: TestApp,
    cookie: String,
    ash_id: Uuid,
}

/// Log in as an admin with two users and three media records mounted:
/// media 1 and 3 belong to ash, media 2 is orphaned.
async fn admin_session() -> AdminSession {
    let app = TestApp::spawn().await;
    let admin_id = Uuid::new_v4();
    let ash_id = Uuid::new_v4();
    let orphan_owner = Uuid::new_v4();

    mocks::password_grant_ok(&app.backend, admin_id, "oak@example.com").await;
    mocks::authenticated_user(&app.backend, admin_id, "oak@example.com").await;
    mocks::role(&app.backend, admin_id, "admin").await;
    mocks::table(
        &app.backend,
        "usuario",
        mocks::USER_COLUMNS,
        json!([
            mocks::user_row(admin_id, "oak", "admin"),
            mocks::user_row(ash_id, "ash", "user"),
        ]),
    )
    .await;
    mocks::table(
        &app.backend,
        "multimedia",
        mocks::MEDIA_COLUMNS,
        json!([
            mocks::media_row(1, "https://cdn.example.com/1.png", ash_id),
            mocks::media_row(2, "https://cdn.example.com/2.png", orphan_owner),
            mocks::media_row(3, "https://cdn.example.com/3.png", ash_id),
        ]),
    )
    .await;

    let cookie = app.login("oak@example.com", "squirtle99x").await;
    AdminSession {
        app,
        cookie,
        ash_id,
    }
}

#[tokio::test]
async fn panel_renders_the_joined_view() {
    let session = admin_session().await;

    let response = session.app.get("/admin", Some(&session.cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    assert!(body.contains("Gestión de Usuarios y Multimedia"));
    // Owned media render under their user rows.
    assert!(body.contains("https://cdn.example.com/1.png"));
    assert!(body.contains("https://cdn.example.com/3.png"));
    // Orphaned media surface in the unowned bucket instead of disappearing.
    assert!(body.contains("Multimedia sin propietario"));
    assert!(body.contains("https://cdn.example.com/2.png"));
    // The flat collection is total over the fetched media.
    assert!(body.contains("3 archivos en total"));
}

#[tokio::test]
async fn panel_stays_loading_when_a_collection_fetch_fails() {
    let app = TestApp::spawn().await;
    let admin_id = Uuid::new_v4();
    mocks::password_grant_ok(&app.backend, admin_id, "oak@example.com").await;
    mocks::authenticated_user(&app.backend, admin_id, "oak@example.com").await;
    mocks::role(&app.backend, admin_id, "admin").await;
    mocks::table_error(&app.backend, "usuario", mocks::USER_COLUMNS).await;
    mocks::table(&app.backend, "multimedia", mocks::MEDIA_COLUMNS, json!([])).await;

    let cookie = app.login("oak@example.com", "squirtle99x").await;
    let response = app.get("/admin", Some(&cookie)).await;

    // No retry and no error page: the panel keeps its loading indicator.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Cargando..."));
    assert!(!body.contains("<table>"));
}

#[tokio::test]
async fn deleting_media_removes_it_from_every_list() {
    let session = admin_session().await;
    mocks::delete_ok(&session.app.backend, "multimedia").await;

    let response = session
        .app
        .post_form(
            "/admin/multimedia/1/eliminar",
            "",
            Some(&session.cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    // Gone from the user's list and from the flat count; the rest remains.
    assert!(!body.contains("https://cdn.example.com/1.png"));
    assert!(body.contains("https://cdn.example.com/3.png"));
    assert!(body.contains("https://cdn.example.com/2.png"));
    assert!(body.contains("2 archivos en total"));
}

#[tokio::test]
async fn deleting_orphaned_media_clears_the_unowned_bucket() {
    let session = admin_session().await;
    mocks::delete_ok(&session.app.backend, "multimedia").await;

    let response = session
        .app
        .post_form(
            "/admin/multimedia/2/eliminar",
            "",
            Some(&session.cookie),
        )
        .await;
    let body = body_text(response).await;

    assert!(!body.contains("https://cdn.example.com/2.png"));
    assert!(!body.contains("Multimedia sin propietario"));
    assert!(body.contains("2 archivos en total"));
}

#[tokio::test]
async fn failed_delete_leaves_the_table_unchanged() {
    let session = admin_session().await;
    mocks::delete_error(&session.app.backend, "multimedia").await;

    let response = session
        .app
        .post_form(
            "/admin/multimedia/1/eliminar",
            "",
            Some(&session.cookie),
        )
        .await;

    // Log-only failure: no visible effect.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("https://cdn.example.com/1.png"));
    assert!(body.contains("3 archivos en total"));
}

#[tokio::test]
async fn saving_a_user_shows_exactly_the_submitted_values() {
    let session = admin_session().await;
    mocks::update_ok(&session.app.backend, "usuario").await;

    let path = format!("/admin/usuarios/{}", session.ash_id);
    let response = session
        .app
        .post_form(
            &path,
            "nombre=Ash+Ketchum&correo=ash%40paleta.example&telefono=555-0123",
            Some(&session.cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    assert!(body.contains("Ash Ketchum"));
    assert!(body.contains("ash@paleta.example"));
    assert!(body.contains("555-0123"));
}

#[tokio::test]
async fn failed_user_update_keeps_the_persisted_values() {
    let session = admin_session().await;
    mocks::update_error(&session.app.backend, "usuario").await;

    let path = format!("/admin/usuarios/{}", session.ash_id);
    let response = session
        .app
        .post_form(
            &path,
            "nombre=Ash+Ketchum&correo=ash%40paleta.example&telefono=555-0123",
            Some(&session.cookie),
        )
        .await;

    // Log-only failure: the table re-renders from the fetched state.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(!body.contains("Ash Ketchum"));
    assert!(body.contains("value=\"ash\""));
}
