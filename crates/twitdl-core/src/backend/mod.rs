//! Extraction backend boundary.
//!
//! Format discovery, network transfer and muxing live outside this crate. A
//! backend answers two questions: what media is behind a URL, and "fetch it
//! to this path while reporting progress".

mod media;
pub mod ytdlp;

pub use media::{FormatInfo, MediaInfo};
pub use ytdlp::YtDlpBackend;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::progress::ProgressSender;
use crate::quality::FormatSpec;

/// Outbound HTTP headers (name -> value) attached to every backend request.
pub type RequestHeaders = BTreeMap<String, String>;

/// Everything the backend needs for one transfer.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub format: FormatSpec,
    /// Destination file. Its parent directory already exists.
    pub output_path: PathBuf,
    pub headers: RequestHeaders,
}

/// Failure signal from a backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend ran and reported a failure (network, authorization, format negotiation).
    #[error("{0}")]
    Failed(String),
    /// The backend program could not be started.
    #[error("cannot run {program}: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Anything else (unreadable output, broken pipes).
    #[error("{0}")]
    Unexpected(String),
}

#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Metadata-only query. `Ok(None)` means the URL has no downloadable media.
    async fn probe(
        &self,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<Option<MediaInfo>, BackendError>;

    /// Downloads `url` to `options.output_path`, sending progress to `events`.
    ///
    /// Events for one call are sent sequentially. The sender is dropped when
    /// the call returns.
    async fn transfer(
        &self,
        url: &str,
        options: &TransferOptions,
        events: ProgressSender,
    ) -> Result<(), BackendError>;
}
