//! `twitdl download` – fetch the video of one post.

use anyhow::{bail, Result};
use std::path::PathBuf;
use twitdl_core::backend::YtDlpBackend;
use twitdl_core::config::TwitdlConfig;
use twitdl_core::credentials::{self, Credentials};
use twitdl_core::{DownloadError, DownloadRequest, DownloadSettings, Downloader, QualityTier};

use crate::cli::input::ctrl_c_pressed;
use crate::cli::progress::TerminalDisplay;

#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub url: String,
    pub output: Option<PathBuf>,
    pub quality: QualityTier,
    pub download_dir: Option<PathBuf>,
}

/// How an interactive or one-shot download ended, when it did not fail.
pub(crate) enum Outcome {
    Saved(PathBuf),
    Cancelled,
}

/// Downloader over the configured yt-dlp, with stored credentials.
pub(crate) fn build_downloader(
    cfg: &TwitdlConfig,
    download_dir: Option<PathBuf>,
) -> Result<Downloader<YtDlpBackend>> {
    let settings = download_settings(cfg, download_dir, credentials::load()?);
    tracing::debug!(?settings, "download settings");
    Ok(Downloader::new(YtDlpBackend::new(&cfg.ytdlp_path), settings))
}

/// Config values with the one-off `--download-dir` override applied.
pub(crate) fn download_settings(
    cfg: &TwitdlConfig,
    download_dir: Option<PathBuf>,
    creds: Credentials,
) -> DownloadSettings {
    let mut settings = DownloadSettings::from_config(cfg, creds);
    if let Some(dir) = download_dir {
        settings.download_dir = dir;
    }
    settings
}

/// Runs the request with a terminal progress display. Ctrl-C drops the
/// transfer, which kills the yt-dlp child.
pub(crate) async fn download_until_interrupted(
    downloader: &Downloader<YtDlpBackend>,
    request: &DownloadRequest,
) -> Result<Outcome, DownloadError> {
    tokio::select! {
        result = downloader.execute(request, TerminalDisplay::new()) => result.map(Outcome::Saved),
        () = ctrl_c_pressed() => {
            tracing::warn!("download interrupted by user: {}", request.url());
            Ok(Outcome::Cancelled)
        }
    }
}

/// Hints printed under a failed download.
pub(crate) fn tips_for(err: &DownloadError) -> &'static [&'static str] {
    match err {
        DownloadError::InvalidUrlFormat(_) => &[
            "Paste the post link, e.g. https://x.com/<user>/status/<id>",
            "Links must start with https://twitter.com/ or https://x.com/",
        ],
        DownloadError::OutputPathUnwritable { .. } => &[
            "Check that the save location exists and is writable",
            "Pick another location with -o or --download-dir",
        ],
        DownloadError::NoMediaFound(_) => &[
            "Verify the post actually contains a video (not only images or a GIF link)",
            "Protected or deleted posts cannot be downloaded",
        ],
        DownloadError::DownloadBackendError(_) => &[
            "Check your internet connection",
            "Verify the post URL is correct",
            "Ensure your bearer token is valid (twitdl config show)",
            "Update yt-dlp; the site changes often",
        ],
        DownloadError::DownloadVerificationFailed(_) => &[
            "Make sure ffmpeg is installed; yt-dlp needs it to merge video and audio",
            "Try a lower quality with -q low",
        ],
        DownloadError::BackendUnavailable(_) => &[
            "Install yt-dlp (https://github.com/yt-dlp/yt-dlp) and make sure it is on PATH",
            "Or set ytdlp_path in the config file",
        ],
    }
}

pub(crate) fn print_tips(err: &DownloadError) {
    eprintln!();
    eprintln!("Tips:");
    for tip in tips_for(err) {
        eprintln!("  - {tip}");
    }
}

pub async fn run_download(cfg: &TwitdlConfig, args: DownloadArgs) -> Result<()> {
    let downloader = build_downloader(cfg, args.download_dir)?;
    let request = DownloadRequest::new(args.url, args.output, args.quality);

    println!("Downloading video from: {}", request.url());
    match download_until_interrupted(&downloader, &request).await {
        Ok(Outcome::Saved(path)) => {
            println!("Video downloaded successfully to: {}", path.display());
            Ok(())
        }
        Ok(Outcome::Cancelled) => bail!("download cancelled"),
        Err(err) => {
            print_tips(&err);
            Err(err.into())
        }
    }
}
