//! URL slugs

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Derive a slug from a title.
///
/// Lower-cases the input, collapses every run of characters outside
/// `[a-z0-9]` into one hyphen and trims hyphens from both ends.
///
/// ```ignore
/// assert_eq!(generate_slug("Luxury 2-Bedroom Apartment!"), "luxury-2-bedroom-apartment");
/// ```
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !result.is_empty() {
                result.push('-');
            }
            pending_hyphen = false;
            result.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    result
}

/// Whether `slug` is lower-case alphanumeric runs joined by single hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}
