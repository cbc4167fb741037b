//! The unit of work handed to [`super::Downloader::execute`].

use std::path::{Path, PathBuf};

use crate::quality::QualityTier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    output: Option<PathBuf>,
    quality: QualityTier,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, output: Option<PathBuf>, quality: QualityTier) -> Self {
        Self {
            url: url.into().trim().to_string(),
            output,
            quality,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Explicit output path, absolute or relative to the save directory.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }
}
