//! Store slug derivation and validation.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits and single hyphens. A store's slug is derived from its
//! name; when the base slug is already taken the next free numeric suffix
//! is appended (`cafe`, `cafe-2`, `cafe-3`, ...).

use deunicode::deunicode;

/// Return `true` when `value` is a valid store slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Derive a base slug from a display name.
///
/// The name is transliterated to ASCII, letters are lowercased, and every
/// run of other characters becomes one hyphen. Leading and trailing hyphens
/// are dropped. The result is empty when the name holds nothing sluggable.
///
/// # Examples
/// ```
/// use catalogue::domain::slugify;
///
/// assert_eq!(slugify("Café del Mar!"), "cafe-del-mar");
/// assert_eq!(slugify("Łódź"), "lodz");
/// assert_eq!(slugify("  ***  "), "");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for ch in ascii.chars() {
        if !ch.is_ascii_alphanumeric() {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push(ch.to_ascii_lowercase());
    }
    slug
}

/// Pattern matching `base` itself or `base` followed by a numeric suffix.
///
/// `base` is a slug, so it contains no regex metacharacters.
#[must_use]
pub fn slug_pattern(base: &str) -> String {
    format!("^{base}(-[0-9]*)?$")
}

/// Pick the slug to try given how many stores already match
/// [`slug_pattern`].
///
/// The count-based suffix can collide when a numbered slug was freed or
/// created out of order; the unique index and insert retry cover that.
#[must_use]
pub fn candidate_slug(base: &str, existing: u64) -> String {
    if existing == 0 {
        base.to_owned()
    } else {
        format!("{base}-{}", existing.saturating_add(1))
    }
}
