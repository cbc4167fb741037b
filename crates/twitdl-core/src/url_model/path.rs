//! Last-segment extraction from post URLs.

/// Returns the final non-empty path segment of `url`, without query or fragment.
///
/// Absolute URLs are parsed with the `url` crate. Anything else (e.g.
/// `x.com/user/status/42`) is split on `/` after dropping the query; a string
/// with no `/` at all yields `None`.
pub fn last_path_segment(url: &str) -> Option<String> {
    let url = url.trim();
    if let Ok(parsed) = url::Url::parse(url) {
        let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
        return Some(segment.to_string());
    }

    let without_query = url.split(['?', '#']).next().unwrap_or("");
    if !without_query.contains('/') {
        return None;
    }
    without_query
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(str::to_string)
}
