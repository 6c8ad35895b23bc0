//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use pokedex_core::{Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// access token is the backend's bearer token for this account; elevated
/// views verify it against the backend instead of trusting the stored role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend identity id (equals the `usuario` row id).
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Profile role as resolved at sign-in (drives menu rendering only).
    pub role: Role,
    /// Backend access token for this session.
    pub access_token: String,
}

impl CurrentUser {
    /// Whether the session role is the administrator literal.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_is_admin_follows_role() {
        let user = CurrentUser {
            id: UserId::new(Uuid::new_v4()),
            email: "oak@example.com".to_string(),
            role: Role::admin(),
            access_token: "jwt".to_string(),
        };
        assert!(user.is_admin());

        let user = CurrentUser {
            role: Role::user(),
            ..user
        };
        assert!(!user.is_admin());
    }
}
