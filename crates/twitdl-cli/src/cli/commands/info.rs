//! `twitdl info` – show what a post holds without downloading it.

use anyhow::Result;
use twitdl_core::backend::MediaInfo;
use twitdl_core::config::TwitdlConfig;

use super::download::{build_downloader, print_tips};

pub async fn run_info(cfg: &TwitdlConfig, url: &str) -> Result<()> {
    let downloader = build_downloader(cfg, None)?;
    match downloader.inspect(url).await {
        Ok(info) => {
            print!("{}", render_info(&info));
            Ok(())
        }
        Err(err) => {
            print_tips(&err);
            Err(err.into())
        }
    }
}

pub(crate) fn render_info(info: &MediaInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("Title:    {}\n", info.title_or_default()));
    out.push_str(&format!("ID:       {}\n", info.id));
    let duration = info
        .duration
        .map(|d| format!("{d:.1}s"))
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("Duration: {duration}\n"));

    let formats = info.mp4_formats();
    if formats.is_empty() {
        out.push_str("No mp4 formats listed; the best available stream will be used.\n");
        return out;
    }
    out.push_str(&format!("\n{:<20} {:<6} {:<8} {}\n", "FORMAT", "EXT", "HEIGHT", "SIZE"));
    for f in formats {
        let height = f
            .height
            .map(|h| format!("{h}p"))
            .unwrap_or_else(|| "-".to_string());
        let size = f
            .filesize
            .map(|s| format!("{s}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<20} {:<6} {:<8} {}\n", f.format_id, f.ext, height, size));
    }
    out
}
