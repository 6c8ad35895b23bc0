//! GoTrue authentication calls.
//!
//! All calls here authenticate with the publishable (anon) key; the
//! service-role key never reaches an auth endpoint.

use serde::Deserialize;
use serde_json::json;

use super::rest::{SupabaseClient, check};
use super::types::{AuthSession, AuthUser};
use super::SupabaseError;

impl SupabaseClient {
    /// Sign in with email and password (password grant).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the backend rejects the
    /// credentials (HTTP 400).
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let response = self
            .http()
            .post(format!("{}/token", self.auth_endpoint()))
            .query(&[("grant_type", "password")])
            .header("apikey", self.anon_key())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = check(response).await?;
        let session = response.json::<AuthSession>().await?;
        Ok(session)
    }

    /// Register a new account.
    ///
    /// Depending on the project's confirmation settings the backend returns
    /// either a full session or a bare user record; both are normalized to
    /// the created identity.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the backend rejects the
    /// sign-up (e.g., email already registered).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .http()
            .post(format!("{}/signup", self.auth_endpoint()))
            .header("apikey", self.anon_key())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = check(response).await?;
        let payload = response.json::<SignUpResponse>().await?;
        payload.into_user()
    }

    /// Fetch the identity the given access token authenticates as.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the token is invalid
    /// or expired.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .http()
            .get(format!("{}/user", self.auth_endpoint()))
            .header("apikey", self.anon_key())
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await?;

        let response = check(response).await?;
        let user = response.json::<AuthUser>().await?;
        Ok(user)
    }
}

/// Sign-up response: a session when auto-confirm is on, a user otherwise.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<pokedex_core::UserId>,
    #[serde(default)]
    email: Option<String>,
}

impl SignUpResponse {
    fn into_user(self) -> Result<AuthUser, SupabaseError> {
        if let Some(user) = self.user {
            return Ok(user);
        }
        match self.id {
            Some(id) => Ok(AuthUser {
                id,
                email: self.email,
            }),
            None => Err(SupabaseError::NotFound("signup user".to_string())),
        }
    }
}
