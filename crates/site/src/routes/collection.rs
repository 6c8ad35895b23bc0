//! Per-user collection handlers: caught Pokémon and favorites.
//!
//! Both tables store the Pokémon by name; the views join the rows to the
//! catalog in memory to show images and types.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use pokedex_core::{CaughtId, FavoriteId};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::Nav;
use crate::state::AppState;
use crate::supabase::{CaughtRecord, FavoriteRecord, NewCollectionEntry, PokemonRecord};

use super::catalog::fetch_catalog;

// =============================================================================
// View Models
// =============================================================================

/// One collection row joined to its catalog entry.
#[derive(Debug, Clone)]
pub struct EntryView {
    /// Collection row id (used by the release/remove actions).
    pub id: i64,
    pub name: String,
    pub image: String,
    pub kind: String,
    /// Render-ready capture date, empty when unknown.
    pub date: String,
}

fn entry_view(id: i64, name: &str, date: String, catalog: &[PokemonRecord]) -> EntryView {
    let found = catalog.iter().find(|p| p.name == name);
    EntryView {
        id,
        name: name.to_string(),
        image: found.map(|p| p.image.clone()).unwrap_or_default(),
        kind: found.map(|p| p.kind.clone()).unwrap_or_default(),
        date,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Caught list template.
#[derive(Template, WebTemplate)]
#[template(path = "capturados.html")]
pub struct CapturadosTemplate {
    pub nav: Nav,
    pub entries: Vec<EntryView>,
}

/// Favorites template.
#[derive(Template, WebTemplate)]
#[template(path = "favoritos.html")]
pub struct FavoritosTemplate {
    pub nav: Nav,
    pub entries: Vec<EntryView>,
}

/// Form used by the catch/favorite actions on the detail page.
#[derive(Debug, Deserialize)]
pub struct EntryForm {
    pub pokemon: String,
}

// =============================================================================
// Caught Routes
// =============================================================================

/// Caught list (`/capturados`).
pub async fn caught(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rows = fetch_caught(&state, &user).await;
    let catalog = fetch_catalog(&state).await;

    let entries = rows
        .iter()
        .map(|row| {
            let date = row
                .caught_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            entry_view(row.id.into_inner(), &row.pokemon, date, &catalog)
        })
        .collect();

    CapturadosTemplate {
        nav: Nav::for_user(&user),
        entries,
    }
}

/// Catch a Pokémon (`POST /capturados`).
pub async fn catch_pokemon(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let entry = NewCollectionEntry {
        user_id: user.id,
        pokemon: &form.pokemon,
    };
    if let Err(e) = state.supabase().table("capturados").insert(&entry).await {
        tracing::error!(error = %e, pokemon = %form.pokemon, "failed to record catch");
    }
    Redirect::to("/capturados").into_response()
}

/// Release a caught Pokémon (`POST /capturados/{id}/liberar`).
pub async fn release(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<CaughtId>,
) -> Response {
    // Scoped to the caller's own rows.
    if let Err(e) = state
        .supabase()
        .table("capturados")
        .eq("id", id)
        .eq("usuarioid", user.id)
        .delete()
        .await
    {
        tracing::error!(error = %e, id = %id, "failed to release");
    }
    Redirect::to("/capturados").into_response()
}

// =============================================================================
// Favorites Routes
// =============================================================================

/// Favorites (`/favoritos`).
pub async fn favorites(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rows = fetch_favorites(&state, &user).await;
    let catalog = fetch_catalog(&state).await;

    let entries = rows
        .iter()
        .map(|row| entry_view(row.id.into_inner(), &row.pokemon, String::new(), &catalog))
        .collect();

    FavoritosTemplate {
        nav: Nav::for_user(&user),
        entries,
    }
}

/// Add a favorite (`POST /favoritos`).
pub async fn add_favorite(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let entry = NewCollectionEntry {
        user_id: user.id,
        pokemon: &form.pokemon,
    };
    if let Err(e) = state.supabase().table("favoritos").insert(&entry).await {
        tracing::error!(error = %e, pokemon = %form.pokemon, "failed to record favorite");
    }
    Redirect::to("/favoritos").into_response()
}

/// Remove a favorite (`POST /favoritos/{id}/eliminar`).
pub async fn remove_favorite(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<FavoriteId>,
) -> Response {
    if let Err(e) = state
        .supabase()
        .table("favoritos")
        .eq("id", id)
        .eq("usuarioid", user.id)
        .delete()
        .await
    {
        tracing::error!(error = %e, id = %id, "failed to remove favorite");
    }
    Redirect::to("/favoritos").into_response()
}

// =============================================================================
// Fetch Helpers
// =============================================================================

async fn fetch_caught(state: &AppState, user: &CurrentUser) -> Vec<CaughtRecord> {
    match state
        .supabase()
        .table("capturados")
        .select("id,usuarioid,pokemon,fecha")
        .eq("usuarioid", user.id)
        .fetch::<CaughtRecord>()
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch caught list");
            Vec::new()
        }
    }
}

async fn fetch_favorites(state: &AppState, user: &CurrentUser) -> Vec<FavoriteRecord> {
    match state
        .supabase()
        .table("favoritos")
        .select("id,usuarioid,pokemon")
        .eq("usuarioid", user.id)
        .fetch::<FavoriteRecord>()
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch favorites");
            Vec::new()
        }
    }
}
