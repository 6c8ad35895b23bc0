//! User role attribute.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's role.
///
/// The backend stores roles as free-form strings; any value is accepted.
/// Only the literal `admin` unlocks elevated views, and the comparison is
/// exact (case-sensitive), matching the backend's behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// The role literal that unlocks administrator views.
    pub const ADMIN: &'static str = "admin";

    /// The role assigned to newly registered accounts.
    pub const USER: &'static str = "user";

    /// Create a role from any string value.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The administrator role.
    #[must_use]
    pub fn admin() -> Self {
        Self(Self::ADMIN.to_owned())
    }

    /// The default role for regular accounts.
    #[must_use]
    pub fn user() -> Self {
        Self(Self::USER.to_owned())
    }

    /// Whether this role is exactly the administrator literal.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    /// Returns the role as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::user()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self(role.to_owned())
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}
