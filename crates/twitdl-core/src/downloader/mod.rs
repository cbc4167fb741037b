//! Download orchestration.
//!
//! Validates a [`DownloadRequest`], resolves quality and output path, probes
//! the backend, runs the transfer while a [`ProgressTracker`] drains its
//! events, then verifies the file landed. Every failure comes back as a
//! [`DownloadError`].

mod request;

pub use request::DownloadRequest;

use std::path::{Path, PathBuf};

use crate::backend::{BackendError, ExtractionBackend, MediaInfo, RequestHeaders, TransferOptions};
use crate::config::TwitdlConfig;
use crate::credentials::Credentials;
use crate::error::DownloadError;
use crate::paths;
use crate::progress::{event_channel, ProgressDisplay, ProgressState, ProgressTracker};
use crate::url_model::{self, SUPPORTED_PREFIXES};

/// Per-process settings passed in at construction.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    /// Save directory for default and relative output paths.
    pub download_dir: PathBuf,
    /// `User-Agent` sent with every backend request.
    pub user_agent: String,
    pub credentials: Credentials,
}

impl DownloadSettings {
    pub fn from_config(cfg: &TwitdlConfig, credentials: Credentials) -> Self {
        Self {
            download_dir: cfg.effective_download_dir(),
            user_agent: cfg.effective_user_agent(),
            credentials,
        }
    }

    fn headers(&self) -> RequestHeaders {
        let mut headers = RequestHeaders::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        if let Some(token) = self.credentials.bearer_token() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers
    }
}

pub struct Downloader<B> {
    backend: B,
    settings: DownloadSettings,
}

impl<B: ExtractionBackend> Downloader<B> {
    pub fn new(backend: B, settings: DownloadSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &DownloadSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Downloads one post's video and returns the absolute path of the file.
    ///
    /// An existing file at the output path is overwritten.
    pub async fn execute<D: ProgressDisplay>(
        &self,
        request: &DownloadRequest,
        display: D,
    ) -> Result<PathBuf, DownloadError> {
        let url = request.url();
        check_supported(url)?;

        let format = request.quality().format_spec();
        let output_path =
            paths::resolve_output_path(url, request.output(), &self.settings.download_dir)?;
        tracing::info!("starting download for: {}", url);
        tracing::info!(quality = %request.quality(), selector = format.selector, "quality setting");
        tracing::info!("output path: {}", output_path.display());
        if output_path.exists() {
            tracing::info!("replacing existing file {}", output_path.display());
        }

        let headers = self.settings.headers();
        let info = self.probe(url, &headers).await?;
        tracing::debug!(id = %info.id, title = info.title_or_default(), formats = info.formats.len(), "media found");

        let options = TransferOptions {
            format,
            output_path: output_path.clone(),
            headers,
        };
        let (events_tx, events_rx) = event_channel();
        let tracker = ProgressTracker::new(display);
        let (transfer, mut tracker) = tokio::join!(
            self.backend.transfer(url, &options, events_tx),
            tracker.run(events_rx)
        );

        if let Err(e) = transfer {
            let err = classify(e);
            tracker.close_display(Some(&err.to_string()));
            tracing::error!("{}", err);
            return Err(err);
        }
        if let ProgressState::Failed(reason) = tracker.state() {
            // Backend said it failed through the event stream but returned Ok.
            let err = DownloadError::DownloadBackendError(reason.clone());
            tracing::error!("{}", err);
            return Err(err);
        }
        tracker.close_display(None);

        verify_output(&output_path).await?;
        tracing::info!("download complete: {}", output_path.display());
        Ok(output_path)
    }

    /// Metadata only: title, duration and the available mp4 formats.
    pub async fn inspect(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let url = url.trim();
        check_supported(url)?;
        self.probe(url, &self.settings.headers()).await
    }

    async fn probe(&self, url: &str, headers: &RequestHeaders) -> Result<MediaInfo, DownloadError> {
        match self.backend.probe(url, headers).await {
            Ok(Some(info)) => Ok(info),
            Ok(None) => {
                tracing::warn!("no video found for {}", url);
                Err(DownloadError::NoMediaFound(url.to_string()))
            }
            Err(e) => {
                let err = classify(e);
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }
}

fn check_supported(url: &str) -> Result<(), DownloadError> {
    if !url_model::is_supported_post_url(url) {
        return Err(DownloadError::InvalidUrlFormat(format!(
            "'{url}' is not a post URL (expected it to start with {})",
            SUPPORTED_PREFIXES.join(" or ")
        )));
    }
    url_model::resource_id_from_url(url).map(|_| ())
}

fn classify(e: BackendError) -> DownloadError {
    match e {
        BackendError::Failed(message) => DownloadError::DownloadBackendError(message),
        e @ BackendError::Unavailable { .. } => DownloadError::BackendUnavailable(e.to_string()),
        BackendError::Unexpected(message) => {
            DownloadError::DownloadBackendError(format!("unexpected error: {message}"))
        }
    }
}

/// The file must exist and hold at least one byte.
async fn verify_output(path: &Path) -> Result<(), DownloadError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => {
            tracing::error!("output file missing after transfer: {}", path.display());
            Err(DownloadError::DownloadVerificationFailed(path.to_path_buf()))
        }
    }
}
