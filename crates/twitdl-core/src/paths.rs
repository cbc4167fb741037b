//! Output path resolution.
//!
//! The default save directory is the OS Downloads folder; explicit paths are
//! taken verbatim when absolute and joined onto the save directory otherwise.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;
use crate::url_model;

/// File name prefix for downloads without an explicit output path.
const DEFAULT_FILE_PREFIX: &str = "twitter_video_";
const DEFAULT_EXTENSION: &str = "mp4";

/// The user's Downloads folder, or `~/Downloads` when the platform has no such folder.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Computes the output path without touching the filesystem.
///
/// An empty `explicit` path is treated as absent.
pub fn output_path_for(
    url: &str,
    explicit: Option<&Path>,
    default_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let path = match explicit.filter(|p| !p.as_os_str().is_empty()) {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => default_dir.join(p),
        None => {
            let id = url_model::resource_id_from_url(url)?;
            default_dir.join(format!("{DEFAULT_FILE_PREFIX}{id}.{DEFAULT_EXTENSION}"))
        }
    };
    Ok(std::path::absolute(&path).unwrap_or(path))
}

/// Resolves the output path and creates its missing parent directories.
pub fn resolve_output_path(
    url: &str,
    explicit: Option<&Path>,
    default_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let path = output_path_for(url, explicit, default_dir)?;
    ensure_parent_dir(&path)?;
    Ok(path)
}

/// Creates all missing parents of `path`. Idempotent.
pub fn ensure_parent_dir(path: &Path) -> Result<(), DownloadError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(|source| DownloadError::OutputPathUnwritable {
        path: parent.to_path_buf(),
        source,
    })?;
    tracing::debug!(dir = %parent.display(), "output directory ready");
    Ok(())
}
