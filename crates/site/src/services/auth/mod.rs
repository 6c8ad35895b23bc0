//! Authentication service.
//!
//! Wraps the backend's password grant and sign-up endpoints and resolves the
//! profile role stored in the `usuario` table. Authentication itself is
//! entirely delegated to the backend; this layer holds no credentials.

mod error;

pub use error::AuthError;

use pokedex_core::{Email, Role, UserId};
use serde::Deserialize;

use crate::models::CurrentUser;
use crate::supabase::{NewProfile, SupabaseClient, SupabaseError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles sign-in and registration against the hosted backend.
pub struct AuthService<'a> {
    supabase: &'a SupabaseClient,
}

/// Projection of the `usuario` table used for role lookups.
#[derive(Debug, Deserialize)]
struct RoleRow {
    #[serde(rename = "roll")]
    role: Role,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(supabase: &'a SupabaseClient) -> Self {
        Self { supabase }
    }

    /// Sign in with email and password.
    ///
    /// On success the returned [`CurrentUser`] carries the backend access
    /// token and the profile role. A failed role lookup after a successful
    /// grant is logged and falls back to the regular role; elevated views
    /// re-check the role against the backend on every request, so the
    /// fallback can never grant access it shouldn't.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the
    /// credentials, and `AuthError::Backend` for any other backend failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;

        let session = self
            .supabase
            .sign_in_with_password(email.as_str(), password)
            .await
            .map_err(|e| match &e {
                SupabaseError::Api(api) if api.is_client_error() => AuthError::InvalidCredentials,
                _ => AuthError::Backend(e),
            })?;

        let role = match self.lookup_role(session.user.id).await {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(error = %e, user = %session.user.id, "role lookup failed after sign-in, assuming regular role");
                Role::user()
            }
        };

        Ok(CurrentUser {
            id: session.user.id,
            email: session.user.email.unwrap_or_else(|| email.into_inner()),
            role,
            access_token: session.access_token,
        })
    }

    /// Register a new account and its `usuario` profile row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` on
    /// input validation failure, `AuthError::EmailTaken` if the backend
    /// rejects the sign-up as a duplicate, and `AuthError::Backend` for any
    /// other backend failure (including the profile insert).
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let user = self
            .supabase
            .sign_up(email.as_str(), password)
            .await
            .map_err(|e| match &e {
                SupabaseError::Api(api)
                    if api.is_client_error()
                        && api.message.to_lowercase().contains("already") =>
                {
                    AuthError::EmailTaken
                }
                _ => AuthError::Backend(e),
            })?;

        // New accounts get the regular role; elevation happens in the backend.
        let role = Role::user();
        let profile = NewProfile {
            id: user.id,
            name,
            email: email.as_str(),
            role: &role,
            phone,
        };
        self.supabase.table("usuario").insert(&profile).await?;

        Ok(())
    }

    /// Fetch the role stored for a profile id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` when the row is missing or the fetch
    /// fails.
    pub async fn lookup_role(&self, id: UserId) -> Result<Role, AuthError> {
        let row = self
            .supabase
            .table("usuario")
            .select("roll")
            .eq("id", id)
            .fetch_one::<RoleRow>()
            .await?;
        Ok(row.role)
    }
}

/// Validate that a password meets minimum requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
