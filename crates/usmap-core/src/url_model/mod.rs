//! URL modeling and filename derivation.
//!
//! A mapping file is cached under the exact (percent-decoded) last path
//! segment of its download URL. Names that cannot be a single Linux path
//! component are rejected rather than rewritten.

mod path;

pub use path::filename_from_url_path;

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Derives the cache filename for a download URL.
///
/// Returns `None` when the URL has no path segment, or the decoded segment is
/// `.`/`..`, contains `/` or NUL, or is longer than NAME_MAX bytes.
///
/// # Examples
///
/// - `derive_filename("https://host/path/abc123.usmap")` → `Some("abc123.usmap")`
/// - `derive_filename("https://host/")` → `None`
pub fn derive_filename(url: &str) -> Option<String> {
    let name = filename_from_url_path(url)?;
    let unusable = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\0'])
        || name.len() > NAME_MAX;
    if unusable {
        None
    } else {
        Some(name)
    }
}
