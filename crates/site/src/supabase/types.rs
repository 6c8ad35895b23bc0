//! Wire types for the backend tables and auth payloads.
//!
//! Field names follow the backend schema exactly (Spanish column names,
//! including the `roll` spelling of the role column); the serde renames keep
//! the Rust side idiomatic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pokedex_core::{CaughtId, FavoriteId, MediaId, PokemonId, Role, UserId};

// =============================================================================
// Auth payloads (GoTrue)
// =============================================================================

/// A session issued by the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Bearer token for subsequent authenticated calls.
    pub access_token: String,
    /// Refresh token, when issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// The authenticated identity.
    pub user: AuthUser,
}

/// The identity a token authenticates as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Table rows (PostgREST)
// =============================================================================

/// Columns fetched from `usuario`.
pub const USER_COLUMNS: &str = "id,nombre,correo,roll,telefono";

/// Columns fetched from `multimedia`.
pub const MEDIA_COLUMNS: &str = "id,url,usuarioid";

/// Columns fetched from `pokemon`.
pub const POKEMON_COLUMNS: &str = "id,nombre,imagen,tipo";

/// Row in the `usuario` table.
///
/// `id` equals the auth identity id for the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "roll")]
    pub role: Role,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

/// Row in the `multimedia` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,
    pub url: String,
    #[serde(rename = "usuarioid")]
    pub owner_id: UserId,
}

/// Row in the `pokemon` catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: PokemonId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "tipo")]
    pub kind: String,
}

/// Row in the `capturados` table (one caught Pokémon per row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaughtRecord {
    pub id: CaughtId,
    #[serde(rename = "usuarioid")]
    pub user_id: UserId,
    pub pokemon: String,
    #[serde(rename = "fecha", default)]
    pub caught_at: Option<DateTime<Utc>>,
}

/// Row in the `favoritos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: FavoriteId,
    #[serde(rename = "usuarioid")]
    pub user_id: UserId,
    pub pokemon: String,
}

// =============================================================================
// Write payloads
// =============================================================================

/// Insert payload for a new `usuario` profile row.
#[derive(Debug, Serialize)]
pub struct NewProfile<'a> {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: &'a str,
    #[serde(rename = "correo")]
    pub email: &'a str,
    #[serde(rename = "roll")]
    pub role: &'a Role,
    #[serde(rename = "telefono")]
    pub phone: Option<&'a str>,
}

/// Insert payload for `capturados` and `favoritos`.
#[derive(Debug, Serialize)]
pub struct NewCollectionEntry<'a> {
    #[serde(rename = "usuarioid")]
    pub user_id: UserId,
    pub pokemon: &'a str,
}

/// Patch payload for editing a `usuario` row.
#[derive(Debug, Serialize)]
pub struct UserPatch<'a> {
    #[serde(rename = "nombre")]
    pub name: &'a str,
    #[serde(rename = "correo")]
    pub email: &'a str,
    #[serde(rename = "telefono")]
    pub phone: Option<&'a str>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_wire_format() {
        let json = r#"{
            "id": "4f2d9c1e-0b3a-4b8e-9f6d-2a7c5e8b1d40",
            "nombre": "Ash",
            "correo": "ash@example.com",
            "roll": "admin",
            "telefono": "555-0199"
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Ash");
        assert_eq!(record.email, "ash@example.com");
        assert!(record.role.is_admin());
        assert_eq!(record.phone.as_deref(), Some("555-0199"));
    }

    #[test]
    fn test_user_record_null_phone() {
        let json = r#"{
            "id": "4f2d9c1e-0b3a-4b8e-9f6d-2a7c5e8b1d40",
            "nombre": "Misty",
            "correo": "misty@example.com",
            "roll": "user",
            "telefono": null
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.phone, None);
    }

    #[test]
    fn test_media_record_wire_format() {
        let json = r#"{
            "id": 7,
            "url": "https://cdn.example.com/p/7.png",
            "usuarioid": "4f2d9c1e-0b3a-4b8e-9f6d-2a7c5e8b1d40"
        }"#;
        let record: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, MediaId::new(7));
    }

    #[test]
    fn test_pokemon_record_wire_format() {
        let json = r#"{"id": 25, "nombre": "pikachu", "imagen": "https://img.example.com/25.png", "tipo": "electrico"}"#;
        let record: PokemonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, PokemonId::new(25));
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.kind, "electrico");
    }

    #[test]
    fn test_user_patch_serializes_backend_columns() {
        let patch = UserPatch {
            name: "Brock",
            email: "brock@example.com",
            phone: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["nombre"], "Brock");
        assert_eq!(json["correo"], "brock@example.com");
        assert!(json["telefono"].is_null());
    }

    #[test]
    fn test_auth_session_parses_password_grant_payload() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": "4f2d9c1e-0b3a-4b8e-9f6d-2a7c5e8b1d40", "email": "ash@example.com"}
        }"#;
        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.email.as_deref(), Some("ash@example.com"));
    }
}
