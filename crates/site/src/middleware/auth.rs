//! Authentication middleware and extractors.
//!
//! The route guard: every navigable path declares its access requirement by
//! taking one of these extractors. A failed session lookup resolves to "no
//! session" rather than an error, so an expired or unreadable session simply
//! redirects to the login page.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Extractor that requires an authenticated session.
///
/// If no identity is present, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection issued by the access-control extractors.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in. Used by the public pages to render the menu state.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Extractor that requires the administrator role.
///
/// Performs the full two-step check against the backend on every request:
/// first the session's access token must still authenticate (the backend is
/// the authority, not the cookie), then the account's `usuario.roll` must be
/// the admin literal. Any failure along the way redirects to the login page.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;

        // Step 1: the token must still identify a backend account.
        let identity = match state.supabase().get_user(&user.access_token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "admin access check: token verification failed");
                return Err(AuthRejection::RedirectToLogin);
            }
        };

        // Step 2: the account's stored role must be the admin literal.
        let auth = AuthService::new(state.supabase());
        let role = match auth.lookup_role(identity.id).await {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(error = %e, user = %identity.id, "admin access check: role lookup failed");
                return Err(AuthRejection::RedirectToLogin);
            }
        };

        if !role.is_admin() {
            tracing::debug!(user = %identity.id, role = %role, "admin access denied");
            return Err(AuthRejection::RedirectToLogin);
        }

        Ok(Self(user))
    }
}

/// Read the current user from the session, treating any failure as absent.
async fn current_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
