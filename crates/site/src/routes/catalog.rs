//! Catalog route handlers: listing, random sample, and detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use rand::seq::IndexedRandom;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Nav;
use crate::state::AppState;
use crate::supabase::{POKEMON_COLUMNS, PokemonRecord, SupabaseError};

/// How many entries the random view shows.
const RANDOM_SAMPLE: usize = 6;

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "lista.html")]
pub struct ListaTemplate {
    pub nav: Nav,
    pub pokemon: Vec<PokemonRecord>,
}

/// Random sample template.
#[derive(Template, WebTemplate)]
#[template(path = "aleatorios.html")]
pub struct AleatoriosTemplate {
    pub nav: Nav,
    pub pokemon: Vec<PokemonRecord>,
}

/// Detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "detalle.html")]
pub struct DetalleTemplate {
    pub nav: Nav,
    pub pokemon: PokemonRecord,
}

/// Catalog listing (`/`).
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let pokemon = fetch_catalog(&state).await;
    ListaTemplate {
        nav: Nav::for_user(&user),
        pokemon,
    }
}

/// Random sample (`/aleatorios`).
pub async fn random(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let catalog = fetch_catalog(&state).await;
    let mut rng = rand::rng();
    let pokemon = catalog
        .choose_multiple(&mut rng, RANDOM_SAMPLE)
        .cloned()
        .collect();

    AleatoriosTemplate {
        nav: Nav::for_user(&user),
        pokemon,
    }
}

/// Detail page (`/detalle/{name}`).
pub async fn detail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<DetalleTemplate, AppError> {
    let pokemon = state
        .supabase()
        .table("pokemon")
        .select(POKEMON_COLUMNS)
        .eq("nombre", &name)
        .fetch_one::<PokemonRecord>()
        .await
        .map_err(|e| match e {
            SupabaseError::NotFound(_) => AppError::NotFound(name.clone()),
            other => AppError::Supabase(other),
        })?;

    Ok(DetalleTemplate {
        nav: Nav::for_user(&user),
        pokemon,
    })
}

/// Fetch the full catalog, rendering an empty list on failure.
pub(super) async fn fetch_catalog(state: &AppState) -> Vec<PokemonRecord> {
    match state
        .supabase()
        .table("pokemon")
        .select(POKEMON_COLUMNS)
        .fetch::<PokemonRecord>()
        .await
    {
        Ok(pokemon) => pokemon,
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch catalog");
            Vec::new()
        }
    }
}
