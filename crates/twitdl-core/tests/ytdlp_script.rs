//! Runs the yt-dlp backend against a shell script that speaks the same
//! command-line and progress-line protocol.
//!
//! All scenarios share one test so the script is written and executed from a
//! single thread.
#![cfg(unix)]

mod common;

use common::recording_display::RecordingDisplay;
use common::settings_for;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::tempdir;
use twitdl_core::backend::YtDlpBackend;
use twitdl_core::{DownloadError, DownloadRequest, Downloader, QualityTier};

const SCRIPT: &str = r#"#!/bin/sh
mode="${TWITDL_FAKE_MODE:-ok}"
out=""
probe=0
prev=""
for arg in "$@"; do
  case "$arg" in
    --dump-single-json) probe=1 ;;
  esac
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done

if [ "$mode" = "nomedia" ]; then
  echo "ERROR: [twitter] 42: No video could be found in this tweet" >&2
  exit 1
fi

if [ "$probe" = "1" ]; then
  echo '{"id":"42","title":"clip","duration":3.5,"formats":[{"format_id":"http-832","ext":"mp4","height":480}]}'
  exit 0
fi

echo "[twitter] 42: Downloading guest token"
echo "twitdl-progress downloading 0 6 NA"
echo "twitdl-progress downloading 3 6 NA"
echo "twitdl-progress finished 6 6 NA"
if [ "$mode" = "hang" ]; then
  printf 'abc' > "$out"
  echo $$ > "$out.pid"
  exec sleep 30
fi
if [ "$mode" = "fail" ]; then
  echo "WARNING: retrying" >&2
  echo "ERROR: unable to download video data: HTTP Error 403: Forbidden" >&2
  exit 1
fi
echo "twitdl-postprocess started FFmpegMerger"
printf 'abcdef' > "$out"
exit 0
"#;

/// True while `pid` is a live (non-zombie) process.
fn process_alive(pid: &str) -> bool {
    let out = std::process::Command::new("ps")
        .args(["-o", "stat=", "-p", pid])
        .output()
        .unwrap();
    let stat = String::from_utf8_lossy(&out.stdout);
    let stat = stat.trim();
    !stat.is_empty() && !stat.starts_with('Z')
}

fn write_script(dir: &Path) -> PathBuf {
    let path = dir.join("fake-yt-dlp");
    std::fs::write(&path, SCRIPT).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn scripted_ytdlp_scenarios() {
    let bin_dir = tempdir().unwrap();
    let save_dir = tempdir().unwrap();
    let script = write_script(bin_dir.path());
    let url = "https://twitter.com/someone/status/42?s=20";
    let request = DownloadRequest::new(url, None, QualityTier::Best);

    // Success: progress lines drive the display and the file lands.
    std::env::set_var("TWITDL_FAKE_MODE", "ok");
    let downloader = Downloader::new(YtDlpBackend::new(&script), settings_for(save_dir.path()));
    let display = RecordingDisplay::new();
    let path = downloader.execute(&request, display.clone()).await.unwrap();
    assert_eq!(path, save_dir.path().join("twitter_video_42.mp4"));
    assert_eq!(std::fs::read(&path).unwrap(), b"abcdef");
    let log = display.snapshot();
    assert_eq!(log.starts, vec![Some(6)]);
    assert_eq!(log.increments, vec![3, 3]);
    assert_eq!(log.finished, 1);
    assert_eq!(log.notices.len(), 1);

    let info = downloader.inspect(url).await.unwrap();
    assert_eq!(info.title_or_default(), "clip");
    assert_eq!(info.mp4_formats()[0].height, Some(480));

    // Transfer failure: last ERROR line is surfaced verbatim.
    std::env::set_var("TWITDL_FAKE_MODE", "fail");
    let display = RecordingDisplay::new();
    let err = downloader.execute(&request, display.clone()).await.unwrap_err();
    match err {
        DownloadError::DownloadBackendError(m) => assert_eq!(
            m,
            "ERROR: unable to download video data: HTTP Error 403: Forbidden"
        ),
        other => panic!("expected DownloadBackendError, got {other:?}"),
    }
    assert_eq!(display.snapshot().abandoned.len(), 1);

    // No media: probe failure text is recognised and nothing is transferred.
    std::env::set_var("TWITDL_FAKE_MODE", "nomedia");
    let other_dir = tempdir().unwrap();
    let downloader = Downloader::new(YtDlpBackend::new(&script), settings_for(other_dir.path()));
    let err = downloader
        .execute(&request, RecordingDisplay::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::NoMediaFound(_)), "{err:?}");
    assert!(!other_dir.path().join("twitter_video_42.mp4").exists());

    // Dropped transfer: the child is killed and nothing is reported as saved.
    std::env::set_var("TWITDL_FAKE_MODE", "hang");
    let hang_dir = tempdir().unwrap();
    let downloader = Downloader::new(YtDlpBackend::new(&script), settings_for(hang_dir.path()));
    let target = hang_dir.path().join("twitter_video_42.mp4");
    let pid_file = hang_dir.path().join("twitter_video_42.mp4.pid");
    let child_started = async {
        while std::fs::read_to_string(&pid_file).map_or(true, |s| !s.ends_with('\n')) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    };
    tokio::select! {
        result = downloader.execute(&request, RecordingDisplay::new()) => {
            panic!("hung transfer must not complete: {result:?}")
        }
        () = child_started => {}
    }
    let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
    let deadline = Instant::now() + Duration::from_secs(5);
    while process_alive(&pid) {
        assert!(Instant::now() < deadline, "yt-dlp stand-in {pid} survived the dropped transfer");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(std::fs::read(&target).unwrap(), b"abc");

    std::env::remove_var("TWITDL_FAKE_MODE");
}
