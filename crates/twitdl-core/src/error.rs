//! Classified download failures returned by the orchestrator.

use std::path::PathBuf;

/// Every way a download request can fail. Returned to the caller as a value;
/// none of these are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The URL yields no resource identifier or is not a recognized post URL.
    #[error("invalid URL format: {0}")]
    InvalidUrlFormat(String),

    /// The destination directory could not be created.
    #[error("cannot create output directory for {}: {source}", path.display())]
    OutputPathUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata query found nothing downloadable at the URL.
    #[error("no video found at {0}")]
    NoMediaFound(String),

    /// The backend transfer failed. Carries the backend's message verbatim.
    #[error("download failed: {0}")]
    DownloadBackendError(String),

    /// The backend reported success but the output file is missing or empty.
    #[error("download failed - output file not found at {}", .0.display())]
    DownloadVerificationFailed(PathBuf),

    /// The backend executable could not be started.
    #[error("extraction backend unavailable: {0}")]
    BackendUnavailable(String),
}
