//! Backend mock setup helpers.
//!
//! Endpoint paths and query parameters mirror what the site's backend
//! client actually sends; the column lists are imported from the client so
//! the mocks can't drift from the real requests.

use serde_json::{Value, json};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub use pokedex_site::supabase::{MEDIA_COLUMNS, POKEMON_COLUMNS, USER_COLUMNS};

// =============================================================================
// Row builders
// =============================================================================

/// A `usuario` row; the email is derived from the name.
#[must_use]
pub fn user_row(id: Uuid, nombre: &str, roll: &str) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "correo": format!("{nombre}@example.com"),
        "roll": roll,
        "telefono": "555-0100"
    })
}

/// A `multimedia` row.
#[must_use]
pub fn media_row(id: i64, url: &str, owner: Uuid) -> Value {
    json!({ "id": id, "url": url, "usuarioid": owner })
}

/// A `pokemon` catalog row.
#[must_use]
pub fn pokemon_row(id: i64, nombre: &str) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "imagen": format!("https://img.example.com/{id}.png"),
        "tipo": "electrico"
    })
}

// =============================================================================
// GoTrue (auth)
// =============================================================================

/// Accept the password grant for any credentials.
pub async fn password_grant_ok(server: &MockServer, id: Uuid, email: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "test-refresh",
            "user": { "id": id, "email": email }
        })))
        .mount(server)
        .await;
}

/// Reject the password grant the way the backend rejects bad credentials.
pub async fn password_grant_rejected(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(server)
        .await;
}

/// Accept any sign-up.
pub async fn sign_up_ok(server: &MockServer, id: Uuid, email: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "email": email,
            "aud": "authenticated"
        })))
        .mount(server)
        .await;
}

/// Reject a sign-up as a duplicate account.
pub async fn sign_up_duplicate(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "msg": "User already registered" })),
        )
        .mount(server)
        .await;
}

/// Let the stored access token verify against the backend.
pub async fn authenticated_user(server: &MockServer, id: Uuid, email: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": id, "email": email })),
        )
        .mount(server)
        .await;
}

/// Make token verification fail (expired or revoked token).
pub async fn authenticated_user_rejected(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })),
        )
        .mount(server)
        .await;
}

// =============================================================================
// PostgREST (tables)
// =============================================================================

/// Serve the `usuario.roll` lookup for one account.
pub async fn role(server: &MockServer, id: Uuid, roll: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/usuario"))
        .and(query_param("select", "roll"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "roll": roll })))
        .mount(server)
        .await;
}

/// Serve a full-collection fetch for a table.
pub async fn table(server: &MockServer, table_name: &str, select: &str, rows: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table_name}")))
        .and(query_param("select", select))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

/// Make a full-collection fetch fail.
pub async fn table_error(server: &MockServer, table_name: &str, select: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{table_name}")))
        .and(query_param("select", select))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "backend down" })),
        )
        .mount(server)
        .await;
}

/// Accept an update on a table.
pub async fn update_ok(server: &MockServer, table_name: &str) {
    Mock::given(method("PATCH"))
        .and(path(format!("/rest/v1/{table_name}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// Make an update fail.
pub async fn update_error(server: &MockServer, table_name: &str) {
    Mock::given(method("PATCH"))
        .and(path(format!("/rest/v1/{table_name}")))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "backend down" })),
        )
        .mount(server)
        .await;
}

/// Accept an insert on a table.
pub async fn insert_ok(server: &MockServer, table_name: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/rest/v1/{table_name}")))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

/// Accept a delete on a table.
pub async fn delete_ok(server: &MockServer, table_name: &str) {
    Mock::given(method("DELETE"))
        .and(path(format!("/rest/v1/{table_name}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// Make a delete fail.
pub async fn delete_error(server: &MockServer, table_name: &str) {
    Mock::given(method("DELETE"))
        .and(path(format!("/rest/v1/{table_name}")))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "backend down" })),
        )
        .mount(server)
        .await;
}
