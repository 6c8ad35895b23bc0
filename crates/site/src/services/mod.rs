//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Sign-in and registration against the hosted backend
//! - `directory` - Joined user-and-media view for the administration panel

pub mod auth;
pub mod directory;
