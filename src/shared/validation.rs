use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::shared::constants::SPOT_IMAGES_PREFIX;

lazy_static! {
    /// Characters not allowed in a storage object name
    /// - Kept: ASCII letters, digits, '.', '_' and '-'
    /// - Replaced: spaces, slashes, umlauts, anything else
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Turn an asset filename into a safe object name.
///
/// Falls back to a random name when nothing usable is left.
pub fn sanitize_filename(filename: &str) -> String {
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(filename, "_");
    let trimmed = replaced.trim_start_matches('.');

    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        return format!("{}.bin", Uuid::new_v4());
    }

    trimmed.to_string()
}

/// Object key for a spot image: `spots/{uuid}-{filename}`.
///
/// Every call yields a new key, so images with the same name never overwrite
/// each other.
pub fn spot_image_key(filename: &str) -> String {
    format!(
        "{}/{}-{}",
        SPOT_IMAGES_PREFIX,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}
