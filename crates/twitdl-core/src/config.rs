use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::backend::ytdlp::DEFAULT_PROGRAM;
use crate::paths;
use crate::quality::QualityTier;

/// Client identity sent as `User-Agent` unless the config overrides it.
pub const DEFAULT_USER_AGENT: &str = concat!("twitdl/", env!("CARGO_PKG_VERSION"));

/// Global configuration loaded from `~/.config/twitdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitdlConfig {
    /// Save directory; the OS Downloads folder when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Quality used when none is given on the command line.
    #[serde(default)]
    pub default_quality: QualityTier,
    /// yt-dlp executable (name on PATH or absolute path).
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,
    /// Overrides the `User-Agent` header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from(DEFAULT_PROGRAM)
}

impl Default for TwitdlConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            default_quality: QualityTier::Best,
            ytdlp_path: default_ytdlp_path(),
            user_agent: None,
        }
    }
}

impl TwitdlConfig {
    pub fn effective_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(paths::default_download_dir)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("twitdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TwitdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TwitdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TwitdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
