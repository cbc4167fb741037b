//! Parsing of the progress lines produced by our `--progress-template`s.
//!
//! yt-dlp reports progress per stream: a "best" download fetches video and
//! audio one after the other, each counting from zero. The parser folds those
//! into one cumulative count for the whole request.

use crate::progress::ProgressEvent;

pub(super) const DOWNLOAD_MARKER: &str = "twitdl-progress";
pub(super) const POSTPROCESS_MARKER: &str = "twitdl-postprocess";

/// Template for `--progress-template download:...`. Missing fields render as `NA`.
pub(super) fn download_template() -> String {
    format!(
        "download:{DOWNLOAD_MARKER} %(progress.status)s %(progress.downloaded_bytes)s \
         %(progress.total_bytes)s %(progress.total_bytes_estimate)s"
    )
}

/// Template for `--progress-template postprocess:...`.
pub(super) fn postprocess_template() -> String {
    format!("postprocess:{POSTPROCESS_MARKER} %(progress.status)s %(progress.postprocessor)s")
}

#[derive(Debug, Default)]
pub(super) struct ProgressLineParser {
    /// Bytes of streams that already finished.
    completed_bytes: u64,
    finished_sent: bool,
}

impl ProgressLineParser {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Whether a [`ProgressEvent::Finished`] has been produced.
    pub(super) fn finished_sent(&self) -> bool {
        self.finished_sent
    }

    /// Returns the request-level event for one stdout line, if it is one of ours.
    pub(super) fn parse_line(&mut self, line: &str) -> Option<ProgressEvent> {
        let mut fields = line.split_whitespace();
        match fields.next()? {
            DOWNLOAD_MARKER => {
                let status = fields.next()?;
                let downloaded = fields.next().and_then(parse_bytes);
                let total = fields.next().and_then(parse_bytes);
                let estimate = fields.next().and_then(parse_bytes);
                self.on_download(status, downloaded, total.or(estimate))
            }
            POSTPROCESS_MARKER if !self.finished_sent => {
                self.finished_sent = true;
                Some(ProgressEvent::Finished)
            }
            _ => None,
        }
    }

    fn on_download(
        &mut self,
        status: &str,
        downloaded: Option<u64>,
        total: Option<u64>,
    ) -> Option<ProgressEvent> {
        match status {
            "downloading" => Some(ProgressEvent::Downloading {
                downloaded_bytes: self.completed_bytes + downloaded.unwrap_or(0),
                total_bytes: total.map(|t| self.completed_bytes + t),
            }),
            "finished" => {
                self.completed_bytes += total.or(downloaded).unwrap_or(0);
                Some(ProgressEvent::Downloading {
                    downloaded_bytes: self.completed_bytes,
                    total_bytes: None,
                })
            }
            "error" => Some(ProgressEvent::Failed("yt-dlp reported a download error".to_string())),
            _ => None,
        }
    }
}

/// `NA` and garbage become `None`; float estimates are truncated.
fn parse_bytes(field: &str) -> Option<u64> {
    field
        .parse::<u64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
}

/// Picks the most useful error line from yt-dlp's stderr.
pub(super) fn error_message(stderr_lines: &[String]) -> Option<String> {
    stderr_lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr_lines.iter().rev().find(|l| !l.trim().is_empty()))
        .map(|l| l.trim().to_string())
}

/// yt-dlp phrasing for "the post exists but holds no video".
pub(super) fn is_no_media_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["no video could be found", "no video formats found", "no media found", "there's no video"]
        .iter()
        .any(|needle| lower.contains(needle))
}
