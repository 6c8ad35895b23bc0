//! Profile route handler (`/usuarios`).
//!
//! Shows the current account's `usuario` row and the media records it owns.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Nav;
use crate::state::AppState;
use crate::supabase::{MEDIA_COLUMNS, MediaRecord, USER_COLUMNS, UserRecord};

/// Render-ready profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: String,
}

impl From<UserRecord> for ProfileView {
    fn from(record: UserRecord) -> Self {
        Self {
            name: record.name,
            email: record.email,
            role: record.role.to_string(),
            phone: record.phone.unwrap_or_default(),
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "usuarios.html")]
pub struct UsuariosTemplate {
    pub nav: Nav,
    pub has_profile: bool,
    pub profile: ProfileView,
    pub media: Vec<MediaRecord>,
}

/// Profile page handler.
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let profile = match state
        .supabase()
        .table("usuario")
        .select(USER_COLUMNS)
        .eq("id", user.id)
        .fetch_one::<UserRecord>()
        .await
    {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::error!(error = %e, user = %user.id, "failed to fetch profile");
            None
        }
    };

    let media = match state
        .supabase()
        .table("multimedia")
        .select(MEDIA_COLUMNS)
        .eq("usuarioid", user.id)
        .fetch::<MediaRecord>()
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, user = %user.id, "failed to fetch media");
            Vec::new()
        }
    };

    UsuariosTemplate {
        nav: Nav::for_user(&user),
        has_profile: profile.is_some(),
        profile: profile.map(ProfileView::from).unwrap_or_default(),
        media,
    }
}
