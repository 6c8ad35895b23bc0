//! Administration panel route handlers.
//!
//! The panel loads the full `usuario` and `multimedia` collections, joins
//! them in memory (see [`crate::services::directory`]), and renders an
//! editable table. Mutations are issued to the backend first; only after the
//! backend confirms is the in-memory view reconciled and re-rendered as a
//! table fragment - never a second fetch within the same interaction.
//!
//! Failure behavior is deliberate: a failed collection fetch leaves the
//! panel in its loading state, and a failed mutation re-renders the
//! unchanged table. Both are logged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use pokedex_core::{MediaId, UserId};

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::Nav;
use crate::services::directory::{Directory, UserWithMedia};
use crate::state::AppState;
use crate::supabase::{MEDIA_COLUMNS, MediaRecord, USER_COLUMNS, UserPatch, UserRecord};

// =============================================================================
// View Models
// =============================================================================

/// Media entry for templates.
#[derive(Debug, Clone)]
pub struct MediaView {
    pub id: String,
    pub url: String,
}

impl From<&MediaRecord> for MediaView {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: record.id.to_string(),
            url: record.url.clone(),
        }
    }
}

/// User row for the management table.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: String,
    pub media: Vec<MediaView>,
}

impl From<&UserWithMedia> for UserRowView {
    fn from(entry: &UserWithMedia) -> Self {
        Self {
            id: entry.user.id.to_string(),
            name: entry.user.name.clone(),
            email: entry.user.email.clone(),
            role: entry.user.role.to_string(),
            phone: entry.user.phone.clone().unwrap_or_default(),
            media: entry.media.iter().map(MediaView::from).collect(),
        }
    }
}

/// Joined view prepared for rendering.
#[derive(Debug, Clone)]
pub struct DirectoryView {
    pub users: Vec<UserRowView>,
    pub unowned: Vec<MediaView>,
    pub total_media: usize,
}

impl From<&Directory> for DirectoryView {
    fn from(directory: &Directory) -> Self {
        Self {
            users: directory.users.iter().map(UserRowView::from).collect(),
            unowned: directory.unowned.iter().map(MediaView::from).collect(),
            total_media: directory.media.len(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Management panel template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub nav: Nav,
    pub directory: DirectoryView,
}

/// Loading state shown while (or because) the collections are unavailable.
#[derive(Template, WebTemplate)]
#[template(path = "admin/cargando.html")]
pub struct AdminLoadingTemplate {
    pub nav: Nav,
}

/// Management table fragment returned by the mutation endpoints.
#[derive(Template)]
#[template(path = "admin/_tabla.html")]
pub struct AdminTableTemplate {
    pub directory: DirectoryView,
}

/// Edit form for one user row.
#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    pub nombre: String,
    pub correo: String,
    pub telefono: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Management panel (`GET /admin`).
pub async fn panel(RequireAdmin(admin): RequireAdmin, State(state): State<AppState>) -> Response {
    match fetch_directory(&state).await {
        Some(directory) => AdminTemplate {
            nav: Nav::for_user(&admin),
            directory: DirectoryView::from(&directory),
        }
        .into_response(),
        None => AdminLoadingTemplate {
            nav: Nav::for_user(&admin),
        }
        .into_response(),
    }
}

/// Save edits to a user row (`POST /admin/usuarios/{id}`).
///
/// Returns the management table fragment. On backend success the displayed
/// values are exactly the submitted ones; on failure the table is unchanged.
pub async fn save_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Form(form): Form<EditUserForm>,
) -> Response {
    let Some(mut directory) = fetch_directory(&state).await else {
        return AdminTableUnavailable.into_response();
    };

    let patch = UserPatch {
        name: &form.nombre,
        email: &form.correo,
        phone: form.telefono.as_deref(),
    };
    match state
        .supabase()
        .table("usuario")
        .eq("id", id)
        .update(&patch)
        .await
    {
        Ok(()) => {
            directory.apply_user_edit(id, &form.nombre, &form.correo, form.telefono.as_deref());
        }
        Err(e) => {
            tracing::error!(error = %e, user = %id, "failed to update user record");
        }
    }

    render_table(&directory)
}

/// Delete a media record (`POST /admin/multimedia/{id}/eliminar`).
///
/// Returns the management table fragment with the record removed from the
/// flat collection, every user's list, and the unowned bucket.
pub async fn delete_media(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<MediaId>,
) -> Response {
    let Some(mut directory) = fetch_directory(&state).await else {
        return AdminTableUnavailable.into_response();
    };

    match state
        .supabase()
        .table("multimedia")
        .eq("id", id)
        .delete()
        .await
    {
        Ok(()) => directory.remove_media(id),
        Err(e) => {
            tracing::error!(error = %e, media = %id, "failed to delete media record");
        }
    }

    render_table(&directory)
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch both collections concurrently and build the joined view.
///
/// `None` means at least one fetch failed; the caller renders the loading
/// state (no retry, no user-visible error).
async fn fetch_directory(state: &AppState) -> Option<Directory> {
    let (users, media) = tokio::join!(
        state
            .supabase()
            .table("usuario")
            .select(USER_COLUMNS)
            .fetch::<UserRecord>(),
        state
            .supabase()
            .table("multimedia")
            .select(MEDIA_COLUMNS)
            .fetch::<MediaRecord>(),
    );

    match (users, media) {
        (Ok(users), Ok(media)) => Some(Directory::build(users, media)),
        (users, media) => {
            if let Err(e) = users {
                tracing::error!(error = %e, "failed to fetch user collection");
            }
            if let Err(e) = media {
                tracing::error!(error = %e, "failed to fetch media collection");
            }
            None
        }
    }
}

/// Placeholder fragment when the collections could not be fetched at all.
struct AdminTableUnavailable;

impl IntoResponse for AdminTableUnavailable {
    fn into_response(self) -> Response {
        Html("<div id=\"admin-tabla\"><p>Cargando...</p></div>".to_string()).into_response()
    }
}

fn render_table(directory: &Directory) -> Response {
    let template = AdminTableTemplate {
        directory: DirectoryView::from(directory),
    };
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
    .into_response()
}
