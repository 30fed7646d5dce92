//! Pure input helpers: no I/O, no state.

use crate::types::DbValue;

/// Trim a string and strip angle brackets and quote characters.
///
/// This is a guard for values that end up in non-parameterized contexts
/// (log lines, identifiers assembled by application code), not a
/// substitute for positional parameters.
#[must_use]
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

/// [`sanitize_input`] lifted over `DbValue`: text is sanitized, every
/// other variant passes through unchanged.
#[must_use]
pub fn sanitize_value(value: &DbValue) -> DbValue {
    match value {
        DbValue::Text(s) => DbValue::Text(sanitize_input(s)),
        other => other.clone(),
    }
}

/// True iff both values are finite and within the standard latitude and
/// longitude ranges.
#[must_use]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
