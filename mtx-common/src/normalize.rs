//! Filesystem-safe path normalisation
//!
//! Portable players are usually formatted with filesystems (FAT32, exFAT) that
//! reject a handful of characters a Linux music library happily stores in
//! file names. Every run of such characters is replaced by a single `-`.
//!
//! The same function produces both destination paths and the identity keys
//! used to match songs, so it must be idempotent.

/// Characters rejected by the constrained destination filesystems
pub const UNSAFE_CHARS: [char; 7] = [':', '*', '?', '"', '|', '<', '>'];

/// Replacement for a run of unsafe characters
const REPLACEMENT: char = '-';

/// Returns true if `c` cannot be stored on a constrained destination filesystem
pub fn is_unsafe_char(c: char) -> bool {
    UNSAFE_CHARS.contains(&c)
}

/// Collapse every run of unsafe characters in `path` into a single `-`.
///
/// Total and pure: characters outside [`UNSAFE_CHARS`] (including multi-byte
/// and astral-plane code points) pass through untouched and in order.
///
/// # Examples
///
/// ```
/// use mtx_common::normalize_path;
///
/// assert_eq!(normalize_path("Panorama: Form"), "Panorama- Form");
/// assert_eq!(normalize_path("P*Light"), "P-Light");
/// assert_eq!(normalize_path("Am I Awake?"), "Am I Awake-");
/// assert_eq!(normalize_path("a:*?b"), "a-b");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut in_unsafe_run = false;

    for c in path.chars() {
        if is_unsafe_char(c) {
            if !in_unsafe_run {
                normalized.push(REPLACEMENT);
                in_unsafe_run = true;
            }
        } else {
            normalized.push(c);
            in_unsafe_run = false;
        }
    }

    normalized
}
