//! Quality tiers and the yt-dlp format selectors they map to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse user-selectable video quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Best,
    Medium,
    Low,
}

/// Format selection handed to the backend. Derived from a [`QualityTier`], never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// yt-dlp `-f` expression.
    pub selector: &'static str,
    /// Container the streams are merged or remuxed into.
    pub merge_output_format: &'static str,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Best, QualityTier::Medium, QualityTier::Low];

    /// The fixed format selection for this tier.
    pub fn format_spec(self) -> FormatSpec {
        match self {
            QualityTier::Best => FormatSpec {
                selector: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
                merge_output_format: "mp4",
            },
            // Smallest stream that is still at least 480 lines tall.
            QualityTier::Medium => FormatSpec {
                selector: "worstvideo[height>=480][ext=mp4]+worstaudio[ext=m4a]/worst[height>=480][ext=mp4]",
                merge_output_format: "mp4",
            },
            QualityTier::Low => FormatSpec {
                selector: "worstvideo+worstaudio/worst",
                merge_output_format: "mp4",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Best => "best",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(QualityTier::Best),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            other => Err(format!("unknown quality '{other}' (expected best, medium or low)")),
        }
    }
}
