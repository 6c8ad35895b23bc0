//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Catalog listing
//! GET  /health                   - Health check
//!
//! # Catalog
//! GET  /aleatorios               - Random sample of the catalog
//! GET  /detalle/{name}           - Pokémon detail
//!
//! # Collections (per user)
//! GET  /capturados               - Caught list
//! POST /capturados               - Catch a Pokémon
//! POST /capturados/{id}/liberar  - Release a caught Pokémon
//! GET  /favoritos                - Favorites
//! POST /favoritos                - Add a favorite
//! POST /favoritos/{id}/eliminar  - Remove a favorite
//!
//! # Profile
//! GET  /usuarios                 - Current user's profile and media
//!
//! # Auth
//! GET  /login                    - Login page
//! POST /login                    - Login action
//! GET  /registro                 - Registration page
//! POST /registro                 - Registration action
//! POST /logout                   - Logout action
//!
//! # Administration (requires the admin role)
//! GET  /admin                           - Management panel
//! POST /admin/usuarios/{id}             - Save user edits (fragment)
//! POST /admin/multimedia/{id}/eliminar  - Delete a media record (fragment)
//! ```

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod collection;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::models::CurrentUser;
use crate::state::AppState;

/// Menu state shared by every page template.
///
/// The navigation renders only for authenticated sessions, and the
/// administrator link only when the session role is the admin literal.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub logged_in: bool,
    pub is_admin: bool,
}

impl Nav {
    /// Menu state for an authenticated page.
    #[must_use]
    pub fn for_user(user: &CurrentUser) -> Self {
        Self {
            logged_in: true,
            is_admin: user.is_admin(),
        }
    }

    /// Menu state for an optional identity (public pages).
    #[must_use]
    pub fn for_visitor(user: Option<&CurrentUser>) -> Self {
        user.map_or_else(Self::default, Self::for_user)
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/registro", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the administration routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::panel))
        .route("/usuarios/{id}", post(admin::save_user))
        .route("/multimedia/{id}/eliminar", post(admin::delete_media))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        .route("/aleatorios", get(catalog::random))
        .route("/detalle/{name}", get(catalog::detail))
        // Collections
        .route(
            "/capturados",
            get(collection::caught).post(collection::catch_pokemon),
        )
        .route("/capturados/{id}/liberar", post(collection::release))
        .route(
            "/favoritos",
            get(collection::favorites).post(collection::add_favorite),
        )
        .route("/favoritos/{id}/eliminar", post(collection::remove_favorite))
        // Profile
        .route("/usuarios", get(profile::show))
        // Administration
        .nest("/admin", admin_routes())
        // Auth
        .merge(auth_routes())
}
