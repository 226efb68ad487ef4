//! Slug derivation for catalog templates.
//!
//! A derived slug is the lower-cased title with non-alphanumeric runs
//! collapsed to a single hyphen, followed by a uniqueness token built from
//! the creation time and a short random suffix. The token makes derived
//! slugs collision-free without a lookup-and-retry loop.

use rand::Rng;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum accepted length for an explicit slug.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Base used when a title contains no alphanumeric characters at all.
pub const FALLBACK_SLUG_BASE: &str = "template";

/// Number of random characters appended after the timestamp.
const RANDOM_SUFFIX_LENGTH: usize = 6;

/// Generate a URL-safe slug from a title.
///
/// Converts to lowercase, replaces every non-alphanumeric character with a
/// hyphen, collapses consecutive hyphens, and trims leading/trailing hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    result.trim_matches('-').to_string()
}

/// Build the uniqueness token for a slug created at `created_at`.
pub fn uniqueness_token(created_at: Timestamp) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(RANDOM_SUFFIX_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", created_at.timestamp_millis(), suffix)
}

/// Join a title-derived base and a token into a slug.
pub fn slug_with_token(title: &str, token: &str) -> String {
    let base = generate_slug(title);
    let base = if base.is_empty() {
        FALLBACK_SLUG_BASE
    } else {
        base.as_str()
    };
    format!("{base}-{token}")
}

/// Derive a unique slug for a template created at `created_at`.
pub fn derive_unique_slug(title: &str, created_at: Timestamp) -> String {
    slug_with_token(title, &uniqueness_token(created_at))
}

/// Validate an explicitly supplied slug (non-empty, lowercase alphanumeric
/// and hyphens only, bounded length).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}
