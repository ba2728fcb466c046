//! Artifact filename convention.
//!
//! Output files are named `{slug}_{hash8}_{timestamp}.glb` — a cleaned
//! fragment of the prompt for humans, a content hash plus a unix timestamp
//! for collision resistance. Concurrent writers never need a lock because
//! two requests cannot produce the same name unless content and second
//! coincide, and the hash breaks that tie.

use crate::hashing::short_hash;

/// Maximum length of the human-readable slug portion.
pub const SLUG_MAX_CHARS: usize = 50;

/// Hex characters of content hash embedded in the filename.
pub const NAME_HASH_CHARS: usize = 8;

/// Reduce free text to a filesystem-safe slug.
///
/// Keeps ASCII alphanumerics, collapses runs of everything else to a single
/// `_`, lower-cases, and truncates to [`SLUG_MAX_CHARS`]. Falls back to
/// `"model"` when nothing survives.
///
/// # Examples
///
/// ```
/// use hy3d_core::naming::slugify;
///
/// assert_eq!(slugify("A cute robot toy"), "a_cute_robot_toy");
/// assert_eq!(slugify("!!!"), "model");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = true; // suppress a leading separator

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
        if slug.len() >= SLUG_MAX_CHARS {
            break;
        }
    }

    let slug = slug.trim_end_matches('_').to_string();
    if slug.is_empty() {
        "model".to_string()
    } else {
        slug
    }
}

/// Build the artifact filename for a generated model.
///
/// * `slug_source` — text the slug is derived from (prompt or input kind).
/// * `content` — bytes hashed into the name (the prompt or image payload).
/// * `unix_timestamp` — seconds since the epoch at write time.
pub fn artifact_filename(slug_source: &str, content: &[u8], unix_timestamp: i64) -> String {
    format!(
        "{}_{}_{}.glb",
        slugify(slug_source),
        short_hash(content, NAME_HASH_CHARS),
        unix_timestamp
    )
}
