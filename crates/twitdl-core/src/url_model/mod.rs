//! Post URL modeling.
//!
//! Recognizes Twitter/X post URLs and derives the resource identifier used
//! for default output file names.

mod path;

pub use path::last_path_segment;

use crate::error::DownloadError;

/// URL prefixes accepted as post URLs.
pub const SUPPORTED_PREFIXES: [&str; 2] = ["https://twitter.com/", "https://x.com/"];

/// Best-effort identifier of a post (the tweet id for status URLs). Only used
/// for naming; never validated against the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `url` starts with one of [`SUPPORTED_PREFIXES`].
pub fn is_supported_post_url(url: &str) -> bool {
    let url = url.trim();
    SUPPORTED_PREFIXES.iter().any(|p| url.starts_with(p))
}

/// Extracts the resource identifier: the last non-empty path segment, query stripped.
///
/// # Examples
///
/// - `https://x.com/user/status/42?s=20` → `42`
/// - `no-slash` → `InvalidUrlFormat`
pub fn resource_id_from_url(url: &str) -> Result<ResourceId, DownloadError> {
    last_path_segment(url).map(ResourceId).ok_or_else(|| {
        DownloadError::InvalidUrlFormat(format!("could not extract post id from '{url}'"))
    })
}
