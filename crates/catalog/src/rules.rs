//! Field rules shared by the seller and product payloads.

use sellerhub_core::FieldErrors;
use validator::ValidateEmail;

/// Keep `value` only if it contains something other than whitespace.
///
/// Records `message` against `field` when the value is missing or blank.
pub fn not_blank(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<String>,
    message: &str,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.reject(field, message);
            None
        }
    }
}

/// Keep `value` only if present; records `message` against `field` otherwise.
pub fn not_null<T>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<T>,
    message: &str,
) -> Option<T> {
    if value.is_none() {
        errors.reject(field, message);
    }
    value
}

/// Syntactic email check (local part `@` domain).
pub fn is_email(value: &str) -> bool {
    value.validate_email()
}
