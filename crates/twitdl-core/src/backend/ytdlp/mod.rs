//! Backend that shells out to the `yt-dlp` executable.
//!
//! Metadata comes from `--dump-single-json`; transfers parse progress lines
//! emitted through custom `--progress-template`s on stdout.

mod progress_line;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::{BackendError, ExtractionBackend, MediaInfo, RequestHeaders, TransferOptions};
use crate::progress::{ProgressEvent, ProgressSender};
use progress_line::{
    download_template, error_message, is_no_media_message, postprocess_template,
    ProgressLineParser,
};

/// Program name looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_PROGRAM: &str = if cfg!(target_os = "windows") {
    "yt-dlp.exe"
} else {
    "yt-dlp"
};

#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    program: PathBuf,
}

impl Default for YtDlpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl YtDlpBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `yt-dlp --version`, trimmed.
    pub async fn version(&self) -> Result<String, BackendError> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|source| self.unavailable(source))?;
        if !output.status.success() {
            return Err(BackendError::Failed(format!(
                "{} --version exited with {}",
                self.program.display(),
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn unavailable(&self, source: std::io::Error) -> BackendError {
        BackendError::Unavailable {
            program: self.program.display().to_string(),
            source,
        }
    }

    pub(crate) fn probe_args(url: &str, headers: &RequestHeaders) -> Vec<String> {
        let mut args: Vec<String> = [
            "--dump-single-json",
            "--no-warnings",
            "--no-playlist",
            "--skip-download",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        push_headers(&mut args, headers);
        args.push(url.to_string());
        args
    }

    pub(crate) fn transfer_args(url: &str, options: &TransferOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format.selector.to_string(),
            "--merge-output-format".to_string(),
            options.format.merge_output_format.to_string(),
            // A lone non-mp4 stream (Low tier fallback) is remuxed too.
            "--remux-video".to_string(),
            options.format.merge_output_format.to_string(),
            "-o".to_string(),
            escape_output_template(&options.output_path.to_string_lossy()),
            "--no-playlist".to_string(),
            // Re-running a request replaces the previous file instead of skipping it.
            "--force-overwrites".to_string(),
            "--newline".to_string(),
            "--progress-template".to_string(),
            download_template(),
            "--progress-template".to_string(),
            postprocess_template(),
        ];
        push_headers(&mut args, &options.headers);
        args.push(url.to_string());
        args
    }
}

/// `-o` takes an output template; `%` must be doubled to name a literal path.
fn escape_output_template(path: &str) -> String {
    path.replace('%', "%%")
}

fn push_headers(args: &mut Vec<String>, headers: &RequestHeaders) {
    for (name, value) in headers {
        args.push("--add-header".to_string());
        args.push(format!("{}:{}", name.trim(), value.trim()));
    }
}

#[async_trait]
impl ExtractionBackend for YtDlpBackend {
    async fn probe(
        &self,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<Option<MediaInfo>, BackendError> {
        tracing::debug!(program = %self.program.display(), url, "probing media info");
        let output = self
            .command()
            .args(Self::probe_args(url, headers))
            .output()
            .await
            .map_err(|source| self.unavailable(source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<String> = stderr.lines().map(str::to_string).collect();
            let message = error_message(&lines)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", output.status));
            if is_no_media_message(&message) {
                tracing::info!(url, "{}", message);
                return Ok(None);
            }
            return Err(BackendError::Failed(message));
        }

        let info: MediaInfo = serde_json::from_slice(&output.stdout)
            .map_err(|e| BackendError::Unexpected(format!("yt-dlp returned invalid JSON: {e}")))?;
        Ok(info.has_media().then_some(info))
    }

    async fn transfer(
        &self,
        url: &str,
        options: &TransferOptions,
        events: ProgressSender,
    ) -> Result<(), BackendError> {
        let args = Self::transfer_args(url, options);
        tracing::debug!(program = %self.program.display(), ?args, "starting transfer");

        let mut child = self
            .command()
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.unavailable(source))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Unexpected("yt-dlp stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BackendError::Unexpected("yt-dlp stderr not captured".into()))?;

        let mut parser = ProgressLineParser::new();
        let read_stdout = async {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match parser.parse_line(&line) {
                    Some(event) => {
                        // The receiver only goes away if the caller stopped listening.
                        let _ = events.send(event).await;
                    }
                    None => tracing::trace!(target: "twitdl::ytdlp", "{}", line),
                }
            }
        };
        let read_stderr = async {
            let mut collected = Vec::new();
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "twitdl::ytdlp", "stderr: {}", line);
                collected.push(line);
            }
            collected
        };

        let (status, (), stderr_lines) = tokio::join!(child.wait(), read_stdout, read_stderr);
        let status =
            status.map_err(|e| BackendError::Unexpected(format!("waiting for yt-dlp: {e}")))?;

        if status.success() {
            if !parser.finished_sent() {
                let _ = events.send(ProgressEvent::Finished).await;
            }
            return Ok(());
        }

        let message = error_message(&stderr_lines)
            .unwrap_or_else(|| format!("yt-dlp exited with {status}"));
        let _ = events.send(ProgressEvent::Failed(message.clone())).await;
        Err(BackendError::Failed(message))
    }
}
