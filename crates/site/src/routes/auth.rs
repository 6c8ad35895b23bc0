//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the hosted backend. The
//! only user-facing error surface in the app is the login failure message;
//! everything else is logged and redirected with an error code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::routes::Nav;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub telefono: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "registro.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: Nav::for_visitor(user.as_ref()),
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// Authenticates via the backend's password grant. The session picks up the
/// identity here; the home redirect renders whatever the new session allows.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.supabase());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Redirect::to("/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        nav: Nav::for_visitor(user.as_ref()),
        error: query.error,
    }
}

/// Handle registration form submission.
///
/// Creates the account via the backend's sign-up endpoint, then inserts the
/// `usuario` profile row the rest of the app reads.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/registro?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.supabase());

    match auth
        .register(
            &form.nombre,
            &form.email,
            &form.password,
            form.telefono.as_deref(),
        )
        .await
    {
        Ok(()) => Redirect::to("/login?success=registered").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "registration failed");
            let code = match e {
                AuthError::EmailTaken => "email_taken",
                AuthError::WeakPassword(_) => "password_too_short",
                AuthError::InvalidEmail(_) => "invalid_email",
                _ => "failed",
            };
            Redirect::to(&format!("/registro?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the identity and destroys the session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/login").into_response()
}
