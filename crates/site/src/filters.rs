//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Uppercases the first character, leaving the rest untouched.
///
/// Catalog names come from the backend in lowercase.
///
/// Usage in templates: `{{ pokemon.name|titlecase }}`
#[askama::filter_fn]
pub fn titlecase(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let s = value.to_string();
    let mut chars = s.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => s,
    })
}
