//! Short code generation and validation utilities.
//!
//! Generated codes are six lowercase base-36 characters. User-chosen aliases
//! follow a looser alphabet and must not shadow a routed path segment.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const ALIAS_MIN_LENGTH: usize = 3;
pub const ALIAS_MAX_LENGTH: usize = 50;

/// Reserved codes that cannot be used as aliases.
///
/// These are the first path segments of the routed endpoints.
pub const RESERVED_ALIASES: &[&str] = &["api", "health"];

/// Generates a random six-character code from `[0-9a-z]`.
///
/// The result is not checked for uniqueness; callers rely on the store's
/// unique constraint and retry on conflict.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved path segment (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    let len = alias.chars().count();
    if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len) {
        return Err(AppError::bad_request(
            format!("Custom alias must be {ALIAS_MIN_LENGTH}-{ALIAS_MAX_LENGTH} characters"),
            json!({ "provided_length": len }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
