//! Filename extraction from URL path.

use percent_encoding::percent_decode_str;

/// Extracts the last path segment from a URL, percent-decoded.
///
/// Returns `None` if the URL cannot be parsed, the path is empty/root, or the
/// decoded segment is not valid UTF-8. Query string and fragment are ignored.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    Some(decoded.into_owned())
}
