//! Media metadata returned by a backend probe.

use serde::{Deserialize, Serialize};

/// One encoded stream the backend can fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Subset of the yt-dlp info dictionary this tool cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Vec<FormatInfo>,
    /// Direct media URL when the extractor resolved a single file.
    #[serde(default)]
    pub url: Option<String>,
    /// Posts with several videos come back as a playlist.
    #[serde(default)]
    pub entries: Option<Vec<MediaInfo>>,
}

impl MediaInfo {
    /// True when there is at least one downloadable stream, here or in any entry.
    pub fn has_media(&self) -> bool {
        !self.formats.is_empty()
            || self.url.is_some()
            || self
                .entries
                .as_deref()
                .is_some_and(|entries| entries.iter().any(MediaInfo::has_media))
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// mp4 streams, tallest first.
    pub fn mp4_formats(&self) -> Vec<&FormatInfo> {
        let mut formats: Vec<&FormatInfo> = self.formats.iter().filter(|f| f.ext == "mp4").collect();
        formats.sort_by(|a, b| b.height.cmp(&a.height));
        formats
    }
}
