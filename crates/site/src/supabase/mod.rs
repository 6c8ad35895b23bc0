//! Supabase backend clients.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local sync, direct API calls
//! - GoTrue (`/auth/v1`) handles password sign-in, sign-up, and token
//!   verification, authenticated with the publishable (anon) key
//! - PostgREST (`/rest/v1`) handles table reads, updates, and deletes,
//!   authenticated server-side with the service-role key
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_site::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase);
//!
//! // Sign in and verify the token later
//! let session = client.sign_in_with_password("ash@example.com", "pikachu").await?;
//! let identity = client.get_user(&session.access_token).await?;
//!
//! // Query a table
//! let users: Vec<UserRecord> = client
//!     .table("usuario")
//!     .select("id,nombre,correo,roll,telefono")
//!     .fetch()
//!     .await?;
//! ```

mod auth;
mod rest;
pub mod types;

pub use rest::{SupabaseClient, TableQuery};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success response.
    #[error("backend error: {0}")]
    Api(ApiError),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found (or not exactly one row where one was required).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Error payload returned by PostgREST and GoTrue.
///
/// PostgREST responds with `{message, code, details, hint}`; GoTrue uses
/// `msg` or `error_description` depending on the endpoint. The aliases below
/// fold all three shapes into one.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ApiError {
    /// HTTP status of the response (filled in by the client, not the body).
    #[serde(skip)]
    pub status: u16,
    /// Human-readable message.
    #[serde(default, alias = "msg", alias = "error_description")]
    pub message: String,
    /// PostgREST error code (e.g., PGRST116).
    #[serde(default)]
    pub code: Option<String>,
    /// Additional details.
    #[serde(default)]
    pub details: Option<String>,
    /// Remediation hint.
    #[serde(default)]
    pub hint: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(code) = &self.code {
            write!(f, " (code {code})")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " - hint: {hint}")?;
        }
        Ok(())
    }
}

impl ApiError {
    /// Whether the response was a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_error_display() {
        let err = SupabaseError::NotFound("pokemon".to_string());
        assert_eq!(err.to_string(), "not found: pokemon");

        let err = SupabaseError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError {
            status: 404,
            message: "relation does not exist".to_string(),
            code: Some("42P01".to_string()),
            details: None,
            hint: None,
        };
        assert_eq!(
            err.to_string(),
            "HTTP 404: relation does not exist (code 42P01)"
        );
    }

    #[test]
    fn test_api_error_display_no_details() {
        let err = ApiError {
            status: 500,
            ..ApiError::default()
        };
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_api_error_parses_postgrest_body() {
        let err: ApiError = serde_json::from_str(
            r#"{"message":"duplicate key","code":"23505","details":null,"hint":null}"#,
        )
        .unwrap();
        assert_eq!(err.message, "duplicate key");
        assert_eq!(err.code.as_deref(), Some("23505"));
    }

    #[test]
    fn test_api_error_parses_gotrue_body() {
        let err: ApiError =
            serde_json::from_str(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .unwrap();
        assert_eq!(err.message, "Invalid login credentials");

        let err: ApiError = serde_json::from_str(r#"{"msg":"User already registered"}"#).unwrap();
        assert_eq!(err.message, "User already registered");
    }

    #[test]
    fn test_is_client_error() {
        let mut err = ApiError::default();
        err.status = 400;
        assert!(err.is_client_error());
        err.status = 502;
        assert!(!err.is_client_error());
    }
}
